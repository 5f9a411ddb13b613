// src/services/reconciler.rs
//
// Multi-Provider Reconciler
//
// CRITICAL RULES:
// - The primary provider decides success; nothing the secondary does turns a
//   resolved primary into a failure
// - The secondary is searched under the primary's canonical name
// - One SearchContext is shared by both providers for the same path
// - An error from a non-mandatory provider means "proceed without"

use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::domain::{GamePlatform, Reconciliation, ResolveOutcome, SearchContext, UnifiedGameInfo};
use crate::error::AppResult;
use crate::services::game_info_resolver::{GameInfoResolver, ResolveTarget, ScanOptions};
use crate::services::progress::ProgressReporter;

pub struct Reconciler {
    primary: GameInfoResolver,
    secondary: Option<GameInfoResolver>,
    progress: Arc<ProgressReporter>,
}

impl Reconciler {
    pub fn new(
        primary: GameInfoResolver,
        secondary: Option<GameInfoResolver>,
        progress: Arc<ProgressReporter>,
    ) -> Self {
        Self {
            primary,
            secondary,
            progress,
        }
    }

    pub fn reconcile(
        &self,
        name: &str,
        path: &Path,
        platform: GamePlatform,
        options: &ScanOptions,
        cancel: &CancellationToken,
    ) -> AppResult<Reconciliation> {
        let target = ResolveTarget { path, platform };
        let mut context = SearchContext::new();

        let primary = match self.resolve_tolerant(
            &self.primary,
            name,
            target,
            &mut context,
            options,
            cancel,
        )? {
            ResolveOutcome::Resolved(info) => info,
            ResolveOutcome::Skipped => return Ok(Reconciliation::Skipped),
            ResolveOutcome::Excluded => return Ok(Reconciliation::Excluded),
            ResolveOutcome::ProceedWithout => return Ok(Reconciliation::NoPrimaryData),
        };

        let Some(secondary_resolver) = &self.secondary else {
            return Ok(Reconciliation::Unified(UnifiedGameInfo::merge(primary, None)));
        };

        let canonical_name = primary.name.clone();
        let secondary = match self.resolve_tolerant(
            secondary_resolver,
            &canonical_name,
            target,
            &mut context,
            options,
            cancel,
        )? {
            ResolveOutcome::Resolved(info) => Some(info),
            ResolveOutcome::Excluded => return Ok(Reconciliation::Excluded),
            ResolveOutcome::Skipped => return Ok(Reconciliation::Skipped),
            ResolveOutcome::ProceedWithout => {
                self.progress.message(format!(
                    "Game not found on {}.",
                    secondary_resolver.settings().display_name
                ));
                None
            }
        };

        Ok(Reconciliation::Unified(UnifiedGameInfo::merge(primary, secondary)))
    }

    /// Resolve, downgrading errors of an optional provider to ProceedWithout
    fn resolve_tolerant(
        &self,
        resolver: &GameInfoResolver,
        name: &str,
        target: ResolveTarget<'_>,
        context: &mut SearchContext,
        options: &ScanOptions,
        cancel: &CancellationToken,
    ) -> AppResult<ResolveOutcome> {
        match resolver.resolve(name, target, context, options, cancel) {
            Err(e) if !e.is_cancelled() && !resolver.settings().mandatory => {
                log::warn!(
                    "{} failed for '{}' ({}), continuing without it: {}",
                    resolver.settings().display_name,
                    name,
                    target.path.display(),
                    e
                );
                Ok(ResolveOutcome::ProceedWithout)
            }
            other => other,
        }
    }
}
