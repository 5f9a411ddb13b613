// src/services/game_info_resolver.rs
//
// Game Info Resolver - one provider's search -> disambiguate -> fetch cycle
//
// CRITICAL RULES:
// - Skip / Exclude / ProceedWithout are outcomes, never errors
// - Provider errors propagate; they are never turned into "no results"
// - The exclusion set only grows, and never holds the selected result
// - Auto-skip answers every prompt with Skip, without asking
// - The provider-prefixed status message is cleared when resolution ends

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::domain::{
    DisambiguationChoice, GameInfo, GamePlatform, ResolveOutcome, SearchContext, SearchResult,
};
use crate::error::{AppError, AppResult};
use crate::integrations::{
    DialogResponse, DialogService, GameInfoProvider, MultipleSearchResultsRequest,
    NoSearchResultsRequest, ProviderSettings,
};
use crate::services::progress::ProgressReporter;

/// Per-job scan behaviour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Answer every prompt with Skip; for unattended runs
    pub auto_skip: bool,
}

impl ScanOptions {
    pub fn interactive() -> Self {
        Self { auto_skip: false }
    }

    pub fn unattended() -> Self {
        Self { auto_skip: true }
    }
}

/// Everything a resolution needs to know about the path being resolved
#[derive(Debug, Clone, Copy)]
pub struct ResolveTarget<'a> {
    pub path: &'a Path,
    pub platform: GamePlatform,
}

// Where the state machine goes after a search or a prompt
enum Step {
    Fetch(SearchResult),
    Search(String),
    Done(ResolveOutcome),
}

pub struct GameInfoResolver {
    provider: Arc<dyn GameInfoProvider>,
    dialog: Arc<dyn DialogService>,
    progress: Arc<ProgressReporter>,
}

impl GameInfoResolver {
    pub fn new(
        provider: Arc<dyn GameInfoProvider>,
        dialog: Arc<dyn DialogService>,
        progress: Arc<ProgressReporter>,
    ) -> Self {
        Self {
            provider,
            dialog,
            progress,
        }
    }

    pub fn settings(&self) -> ProviderSettings {
        self.provider.settings()
    }

    /// Resolve `name` against this provider
    pub fn resolve(
        &self,
        name: &str,
        target: ResolveTarget<'_>,
        context: &mut SearchContext,
        options: &ScanOptions,
        cancel: &CancellationToken,
    ) -> AppResult<ResolveOutcome> {
        let settings = self.provider.settings();
        let result = self.run(&settings, name, target, context, options, cancel);

        self.progress.stop_fetch();
        self.progress.clear_message();

        result
    }

    fn run(
        &self,
        settings: &ProviderSettings,
        name: &str,
        target: ResolveTarget<'_>,
        context: &mut SearchContext,
        options: &ScanOptions,
        cancel: &CancellationToken,
    ) -> AppResult<ResolveOutcome> {
        let mut step = Step::Search(name.trim().to_string());

        loop {
            step = match step {
                Step::Search(name) => {
                    if cancel.is_cancelled() {
                        return Err(AppError::Cancelled);
                    }

                    let results = self.search(settings, &name, target.platform, context)?;
                    match results.len() {
                        0 => self.handle_no_results(settings, &name, target, options)?,
                        1 => results
                            .into_iter()
                            .next()
                            .map(Step::Fetch)
                            .unwrap_or(Step::Done(ResolveOutcome::Skipped)),
                        _ => self.handle_multiple_results(
                            settings, &name, target, results, context, options,
                        )?,
                    }
                }
                Step::Fetch(result) => {
                    let info = self.fetch(settings, &result)?;
                    Step::Done(ResolveOutcome::Resolved(info))
                }
                Step::Done(outcome) => return Ok(outcome),
            };
        }
    }

    // ========================================================================
    // REMOTE CALLS
    // ========================================================================

    fn search(
        &self,
        settings: &ProviderSettings,
        name: &str,
        platform: GamePlatform,
        context: &SearchContext,
    ) -> AppResult<Vec<SearchResult>> {
        self.message(settings, format!("Searching '{}'...", name));
        self.progress.start_fetch();
        let searched = self.provider.search(name, platform);
        self.progress.stop_fetch();

        let results = searched?;
        self.message(settings, format!("Found {} results for '{}'.", results.len(), name));

        if results.len() <= 1 || context.is_empty() {
            return Ok(results);
        }

        self.message(settings, "Filtering previously encountered search results...");
        let filtered: Vec<SearchResult> = results
            .iter()
            .filter(|r| !context.is_excluded(&r.name))
            .cloned()
            .collect();

        if filtered.is_empty() {
            self.message(settings, "No search results after filtering, reverting...");
            Ok(results)
        } else {
            self.message(settings, format!("{} remaining results.", filtered.len()));
            Ok(filtered)
        }
    }

    fn fetch(&self, settings: &ProviderSettings, result: &SearchResult) -> AppResult<GameInfo> {
        self.message(settings, format!("Fetching '{}'...", result.name));
        self.progress.start_fetch();
        let fetched = self.provider.fetch(result);
        self.progress.stop_fetch();

        let info = fetched?;
        log::debug!("{} game info: {:?}", settings.display_name, info.name);
        self.message(settings, "Done.");

        Ok(info)
    }

    // ========================================================================
    // DISAMBIGUATION
    // ========================================================================

    fn handle_no_results(
        &self,
        settings: &ProviderSettings,
        name: &str,
        target: ResolveTarget<'_>,
        options: &ScanOptions,
    ) -> AppResult<Step> {
        if options.auto_skip {
            self.message(settings, "AutoSkip is on.");
            return Ok(Step::Done(ResolveOutcome::Skipped));
        }

        let request = NoSearchResultsRequest {
            provider: settings.display_name.clone(),
            name: name.to_string(),
            path: target.path.to_path_buf(),
            platform: target.platform,
            can_proceed_without: settings.can_proceed_without(),
        };

        loop {
            let choice = match self.dialog.no_search_results(&request)? {
                DialogResponse::Choice(choice) => choice,
                DialogResponse::ShowDetails(result) => {
                    self.dialog.show_details(&result)?;
                    continue;
                }
            };

            match choice {
                DisambiguationChoice::Select(result) => {
                    return Err(AppError::InvalidChoice(format!(
                        "'{}' was selected, but no search results were offered for '{}'",
                        result.name, name
                    )));
                }
                DisambiguationChoice::NewName(new_name) if new_name.trim().is_empty() => {
                    log::warn!("Empty name entered for {}, asking again", target.path.display());
                }
                other => return Ok(terminal_step(other)),
            }
        }
    }

    fn handle_multiple_results(
        &self,
        settings: &ProviderSettings,
        name: &str,
        target: ResolveTarget<'_>,
        mut results: Vec<SearchResult>,
        context: &mut SearchContext,
        options: &ScanOptions,
    ) -> AppResult<Step> {
        if options.auto_skip {
            self.message(settings, "AutoSkip is on.");
            return Ok(Step::Done(ResolveOutcome::Skipped));
        }

        results.sort_by(SearchResult::cmp_release_date_desc);

        let request = MultipleSearchResultsRequest {
            provider: settings.display_name.clone(),
            name: name.to_string(),
            path: target.path.to_path_buf(),
            platform: target.platform,
            results,
            can_proceed_without: settings.can_proceed_without(),
        };

        loop {
            let choice = match self.dialog.multiple_search_results(&request)? {
                DialogResponse::Choice(choice) => choice,
                DialogResponse::ShowDetails(result) => {
                    self.dialog.show_details(&result)?;
                    continue;
                }
            };

            match choice {
                DisambiguationChoice::NewName(new_name) if new_name.trim().is_empty() => {
                    log::warn!("Empty name entered for {}, asking again", target.path.display());
                }
                DisambiguationChoice::NewName(new_name) => {
                    context.exclude(request.results.iter().map(|r| r.name.clone()));
                    return Ok(Step::Search(new_name.trim().to_string()));
                }
                DisambiguationChoice::Select(chosen) => {
                    if !request.results.contains(&chosen) {
                        return Err(AppError::InvalidChoice(format!(
                            "'{}' is not one of the offered search results for '{}'",
                            chosen.name, name
                        )));
                    }

                    context.exclude(
                        request
                            .results
                            .iter()
                            .filter(|r| r.name != chosen.name)
                            .map(|r| r.name.clone()),
                    );
                    return Ok(Step::Fetch(chosen));
                }
                other => return Ok(terminal_step(other)),
            }
        }
    }

    fn message(&self, settings: &ProviderSettings, message: impl AsRef<str>) {
        self.progress
            .message(format!("{}: {}", settings.display_name, message.as_ref()));
    }
}

fn terminal_step(choice: DisambiguationChoice) -> Step {
    match choice {
        DisambiguationChoice::Skip => Step::Done(ResolveOutcome::Skipped),
        DisambiguationChoice::Exclude => Step::Done(ResolveOutcome::Excluded),
        DisambiguationChoice::ProceedWithout => Step::Done(ResolveOutcome::ProceedWithout),
        DisambiguationChoice::NewName(name) => Step::Search(name.trim().to_string()),
        DisambiguationChoice::Select(result) => Step::Fetch(result),
    }
}
