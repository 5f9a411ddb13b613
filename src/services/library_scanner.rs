// src/services/library_scanner.rs
//
// Library Scanner - recursive walk of a library's directory tree
//
// CRITICAL RULES:
// - Siblings are processed one at a time, in file-name order
// - Known paths short-circuit before any provider call
// - Cancellation is checked between siblings and unwinds the hierarchy
// - A pushed sub-library is always popped, whatever the nested walk returned
// - Every visited child path produces exactly one PathProcessed event
// - Job-level errors (catalog, mandatory provider) abort the whole walk

use regex::Regex;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::{
    Game, Library, LibraryHierarchy, Reconciliation, ScanOutcome, ScanSummary,
};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, LibraryRefreshed, PathProcessed};
use crate::integrations::{CreateLibraryRequest, DialogService};
use crate::services::catalog_service::GameCatalog;
use crate::services::game_info_resolver::ScanOptions;
use crate::services::path_classifier::{child_directories, is_library_candidate, PathClassifier};
use crate::services::progress::ProgressReporter;
use crate::services::reconciler::Reconciler;

// ============================================================================
// NAME DERIVATION
// ============================================================================

/// Turns a directory name into a search name.
///
/// Bracketed metadata tokens are dropped, as are dashes that do not join two
/// word parts ("Half-Life" keeps its hyphen). Whitespace runs collapse to one
/// space and the result is trimmed.
pub struct NameRules {
    metadata: Regex,
    whitespace: Regex,
}

impl NameRules {
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            metadata: Regex::new(r"\[.*?\]")?,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    pub fn derive(&self, raw: &str) -> String {
        let without_metadata = self.metadata.replace_all(raw, "");
        self.whitespace
            .split(&without_metadata)
            .map(|token| token.trim_matches('-'))
            .filter(|token| !token.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Name for the directory at `path`; empty when the path has no final segment
    pub fn derive_from_path(&self, path: &Path) -> String {
        path.file_name()
            .map(|name| self.derive(&name.to_string_lossy()))
            .unwrap_or_default()
    }
}

fn check_cancelled(cancel: &CancellationToken) -> AppResult<()> {
    if cancel.is_cancelled() {
        Err(AppError::Cancelled)
    } else {
        Ok(())
    }
}

// ============================================================================
// SCANNER
// ============================================================================

pub struct LibraryScanner {
    catalog: Arc<dyn GameCatalog>,
    classifier: PathClassifier,
    reconciler: Reconciler,
    dialog: Arc<dyn DialogService>,
    progress: Arc<ProgressReporter>,
    event_bus: Arc<EventBus>,
    name_rules: NameRules,
}

impl LibraryScanner {
    pub fn new(
        catalog: Arc<dyn GameCatalog>,
        reconciler: Reconciler,
        dialog: Arc<dyn DialogService>,
        progress: Arc<ProgressReporter>,
        event_bus: Arc<EventBus>,
    ) -> AppResult<Self> {
        Ok(Self {
            classifier: PathClassifier::new(Arc::clone(&catalog)),
            catalog,
            reconciler,
            dialog,
            progress,
            event_bus,
            name_rules: NameRules::new()?,
        })
    }

    pub fn progress(&self) -> &Arc<ProgressReporter> {
        &self.progress
    }

    /// Refresh every known library, each with its own hierarchy
    pub fn refresh_libraries(
        &self,
        options: &ScanOptions,
        cancel: &CancellationToken,
    ) -> AppResult<ScanSummary> {
        self.progress.message("Refreshing libraries...");

        let mut total = ScanSummary::default();
        for library in self.catalog.get_all_libraries()? {
            check_cancelled(cancel)?;
            total += self.refresh_top_level(library, options, cancel)?;
        }

        self.progress.message(format!(
            "Finished refreshing libraries. Added {} new games.",
            total.games_added
        ));
        Ok(total)
    }

    pub fn refresh_library(
        &self,
        library_id: Uuid,
        options: &ScanOptions,
        cancel: &CancellationToken,
    ) -> AppResult<ScanSummary> {
        let library = self
            .catalog
            .get_library(library_id)?
            .ok_or(AppError::NotFound)?;

        self.refresh_top_level(library, options, cancel)
    }

    /// Reprocess one path inside `library`, classification included
    pub fn process_path(
        &self,
        library: &Library,
        path: &Path,
        options: &ScanOptions,
        cancel: &CancellationToken,
    ) -> AppResult<ScanOutcome> {
        let mut hierarchy = LibraryHierarchy::new(library.clone());
        let mut summary = ScanSummary::default();

        let outcome = self.process_child(&mut hierarchy, path, options, cancel, &mut summary)?;
        self.progress.message(format!("Finished processing {}.", path.display()));
        Ok(outcome)
    }

    /// Delete every game whose directory is gone. Returns how many were removed.
    pub fn cleanup_games(&self, cancel: &CancellationToken) -> AppResult<usize> {
        self.progress.message("Cleaning up games...");

        let games = self.catalog.get_all_games()?;
        let mut obsolete: Vec<Game> = Vec::new();

        for (index, game) in games.iter().enumerate() {
            check_cancelled(cancel)?;
            self.progress.set_progress_of(index, games.len());

            if game.is_obsolete() {
                self.progress
                    .message(format!("Obsolete path detected: {}", game.path.display()));
                obsolete.push(game.clone());
            }
        }

        let removed = self.catalog.delete_games(&obsolete)?;
        self.progress.message(format!("Removed {} obsolete games.", removed));
        self.progress.set_progress(0.0);

        Ok(removed)
    }

    // ========================================================================
    // RECURSIVE WALK
    // ========================================================================

    fn refresh_top_level(
        &self,
        library: Library,
        options: &ScanOptions,
        cancel: &CancellationToken,
    ) -> AppResult<ScanSummary> {
        let library_id = library.id;
        let mut hierarchy = LibraryHierarchy::new(library);

        let summary = self.refresh_current_library(&mut hierarchy, options, cancel)?;
        self.event_bus.emit(LibraryRefreshed::new(library_id, summary));

        Ok(summary)
    }

    fn refresh_current_library(
        &self,
        hierarchy: &mut LibraryHierarchy,
        options: &ScanOptions,
        cancel: &CancellationToken,
    ) -> AppResult<ScanSummary> {
        let library = hierarchy.current().clone();
        self.progress.message(format!(
            "Refreshing library: '{}'[{}]",
            library.name, library.platform
        ));

        let directories = child_directories(&library.path)?;
        let total = directories.len();
        let mut summary = ScanSummary::default();

        for (index, path) in directories.iter().enumerate() {
            check_cancelled(cancel)?;
            self.progress.set_progress_of(index, total);
            self.process_child(hierarchy, path, options, cancel, &mut summary)?;
        }

        self.progress.message(format!(
            "{}: Finished refreshing library: '{}'. Added {} new games.",
            library.platform, library.name, summary.games_added
        ));
        self.progress.set_progress(0.0);

        Ok(summary)
    }

    fn process_child(
        &self,
        hierarchy: &mut LibraryHierarchy,
        path: &Path,
        options: &ScanOptions,
        cancel: &CancellationToken,
        summary: &mut ScanSummary,
    ) -> AppResult<ScanOutcome> {
        let outcome = self.decide(hierarchy, path, options, cancel, summary)?;

        summary.record(&outcome);
        log::info!("{}: {}", path.display(), outcome.message());
        self.event_bus
            .emit(PathProcessed::new(path.to_path_buf(), outcome.clone()));

        Ok(outcome)
    }

    fn decide(
        &self,
        hierarchy: &mut LibraryHierarchy,
        path: &Path,
        options: &ScanOptions,
        cancel: &CancellationToken,
        summary: &mut ScanSummary,
    ) -> AppResult<ScanOutcome> {
        let classification = self.classifier.classify(path)?;
        if let Some(outcome) = ScanOutcome::from_classification(classification) {
            log::debug!("{} is {}, skipping...", path.display(), classification);
            return Ok(outcome);
        }

        if !options.auto_skip {
            if let Some(library) =
                self.try_create_library(hierarchy, path, options, cancel, summary)?
            {
                return Ok(ScanOutcome::LibraryCreated { library });
            }
        }

        self.progress.message(format!("Processing: {}...", path.display()));
        self.add_path(hierarchy, path, options, cancel)
    }

    fn try_create_library(
        &self,
        hierarchy: &mut LibraryHierarchy,
        path: &Path,
        options: &ScanOptions,
        cancel: &CancellationToken,
        summary: &mut ScanSummary,
    ) -> AppResult<Option<Library>> {
        if !is_library_candidate(path)? {
            return Ok(None);
        }

        let request = CreateLibraryRequest {
            path: path.to_path_buf(),
            children: child_directories(path)?,
            platform: hierarchy.platform(),
        };
        let Some(def) = self.dialog.create_library(&request)? else {
            return Ok(None);
        };

        let library = self.catalog.add_library(&def.name, &def.path, def.platform)?;
        self.progress
            .message(format!("New library created: '{}'", library.name));

        hierarchy.push(library.clone());
        let nested = self.refresh_current_library(hierarchy, options, cancel);
        hierarchy.pop();

        *summary += nested?;
        Ok(Some(library))
    }

    fn add_path(
        &self,
        hierarchy: &LibraryHierarchy,
        path: &Path,
        options: &ScanOptions,
        cancel: &CancellationToken,
    ) -> AppResult<ScanOutcome> {
        let name = self.name_rules.derive_from_path(path);
        if name.is_empty() {
            self.progress.message("Empty name provided.");
            return Ok(ScanOutcome::Skipped);
        }

        let platform = hierarchy.platform();
        match self
            .reconciler
            .reconcile(&name, path, platform, options, cancel)?
        {
            Reconciliation::Unified(info) => {
                let game = self.catalog.add_game_to_libraries(
                    info,
                    path,
                    platform,
                    hierarchy.libraries(),
                )?;
                Ok(ScanOutcome::Resolved { game })
            }
            Reconciliation::Skipped => {
                self.progress.message("Skipping...");
                Ok(ScanOutcome::Skipped)
            }
            Reconciliation::Excluded => {
                self.progress.message("Excluding...");
                self.catalog.add_excluded_path(path)?;
                Ok(ScanOutcome::Excluded)
            }
            Reconciliation::NoPrimaryData => Ok(ScanOutcome::NoPrimaryData),
        }
    }
}
