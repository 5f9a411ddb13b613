// src/domain/scan/value_objects.rs
//
// Scan Value Objects
//
// Pure, immutable data structures describing per-path scan results.
// Control-flow outcomes (skip, exclude, proceed without) live here as
// variants, never as errors.

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

use crate::domain::game::Game;
use crate::domain::library::Library;
use crate::domain::provider::{GameInfo, UnifiedGameInfo};

// ============================================================================
// PATH CLASSIFICATION
// ============================================================================

/// What the catalog already knows about a path. First match wins, in
/// declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathClassification {
    AlreadyGame,
    AlreadyLibrary,
    Excluded,
    Unclassified,
}

impl PathClassification {
    pub fn is_known(&self) -> bool {
        !matches!(self, PathClassification::Unclassified)
    }
}

impl std::fmt::Display for PathClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathClassification::AlreadyGame => write!(f, "an already mapped game"),
            PathClassification::AlreadyLibrary => write!(f, "an already mapped library"),
            PathClassification::Excluded => write!(f, "an excluded path"),
            PathClassification::Unclassified => write!(f, "a new path"),
        }
    }
}

// ============================================================================
// RESOLVE OUTCOME (ONE PROVIDER)
// ============================================================================

/// Terminal state of one provider's search/disambiguate/fetch cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveOutcome {
    Resolved(GameInfo),
    Skipped,
    Excluded,
    ProceedWithout,
}

// ============================================================================
// RECONCILIATION (ALL PROVIDERS)
// ============================================================================

/// Result of running the primary and secondary providers for one name.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    Unified(UnifiedGameInfo),
    Skipped,
    Excluded,

    /// The primary provider was told to proceed without data
    NoPrimaryData,
}

// ============================================================================
// SCAN OUTCOME (ONE PATH)
// ============================================================================

/// Terminal outcome of one path, reported exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// A new game was persisted
    Resolved { game: Game },

    /// The directory became a sub-library and was scanned recursively
    LibraryCreated { library: Library },

    Skipped,
    Excluded,
    NoPrimaryData,
    AlreadyExcluded,

    /// Already mapped as a game or a library
    AlreadyKnown,
}

impl ScanOutcome {
    pub fn from_classification(classification: PathClassification) -> Option<Self> {
        match classification {
            PathClassification::AlreadyGame | PathClassification::AlreadyLibrary => {
                Some(ScanOutcome::AlreadyKnown)
            }
            PathClassification::Excluded => Some(ScanOutcome::AlreadyExcluded),
            PathClassification::Unclassified => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ScanOutcome::Resolved { .. } => "resolved",
            ScanOutcome::LibraryCreated { .. } => "library_created",
            ScanOutcome::Skipped => "skipped",
            ScanOutcome::Excluded => "excluded",
            ScanOutcome::NoPrimaryData => "no_primary_data",
            ScanOutcome::AlreadyExcluded => "already_excluded",
            ScanOutcome::AlreadyKnown => "already_known",
        }
    }

    /// Human-readable status line for this outcome
    pub fn message(&self) -> String {
        match self {
            ScanOutcome::Resolved { game } => format!("Added {}.", game),
            ScanOutcome::LibraryCreated { library } => format!("Created library {}.", library),
            ScanOutcome::Skipped => "Skipped.".to_string(),
            ScanOutcome::Excluded => "Excluded.".to_string(),
            ScanOutcome::NoPrimaryData => "No data found, nothing added.".to_string(),
            ScanOutcome::AlreadyExcluded => "Already excluded.".to_string(),
            ScanOutcome::AlreadyKnown => "Already mapped.".to_string(),
        }
    }
}

// ============================================================================
// SCAN SUMMARY
// ============================================================================

/// Per-outcome counters for a scan (sub-libraries fold into their parent).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub games_added: usize,
    pub libraries_created: usize,
    pub skipped: usize,
    pub excluded: usize,
    pub no_primary_data: usize,
    pub already_excluded: usize,
    pub already_known: usize,
}

impl ScanSummary {
    pub fn record(&mut self, outcome: &ScanOutcome) {
        match outcome {
            ScanOutcome::Resolved { .. } => self.games_added += 1,
            ScanOutcome::LibraryCreated { .. } => self.libraries_created += 1,
            ScanOutcome::Skipped => self.skipped += 1,
            ScanOutcome::Excluded => self.excluded += 1,
            ScanOutcome::NoPrimaryData => self.no_primary_data += 1,
            ScanOutcome::AlreadyExcluded => self.already_excluded += 1,
            ScanOutcome::AlreadyKnown => self.already_known += 1,
        }
    }

    /// Number of paths with a recorded outcome
    pub fn total(&self) -> usize {
        self.games_added
            + self.libraries_created
            + self.skipped
            + self.excluded
            + self.no_primary_data
            + self.already_excluded
            + self.already_known
    }
}

impl AddAssign for ScanSummary {
    fn add_assign(&mut self, other: Self) {
        self.games_added += other.games_added;
        self.libraries_created += other.libraries_created;
        self.skipped += other.skipped;
        self.excluded += other.excluded;
        self.no_primary_data += other.no_primary_data;
        self.already_excluded += other.already_excluded;
        self.already_known += other.already_known;
    }
}

// ============================================================================
// JOB STATUS
// ============================================================================

/// How a background job ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum JobStatus {
    Completed,
    Cancelled,
    Failed(String),
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Cancelled => write!(f, "cancelled"),
            JobStatus::Failed(error) => write!(f, "failed: {}", error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_maps_to_short_circuit_outcome() {
        assert_eq!(
            ScanOutcome::from_classification(PathClassification::AlreadyGame),
            Some(ScanOutcome::AlreadyKnown)
        );
        assert_eq!(
            ScanOutcome::from_classification(PathClassification::AlreadyLibrary),
            Some(ScanOutcome::AlreadyKnown)
        );
        assert_eq!(
            ScanOutcome::from_classification(PathClassification::Excluded),
            Some(ScanOutcome::AlreadyExcluded)
        );
        assert_eq!(ScanOutcome::from_classification(PathClassification::Unclassified), None);
    }

    #[test]
    fn test_summary_counts_every_outcome_once() {
        let mut summary = ScanSummary::default();
        summary.record(&ScanOutcome::Skipped);
        summary.record(&ScanOutcome::Excluded);
        summary.record(&ScanOutcome::AlreadyKnown);
        summary.record(&ScanOutcome::AlreadyKnown);

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.excluded, 1);
        assert_eq!(summary.already_known, 2);
        assert_eq!(summary.total(), 4);
    }

    #[test]
    fn test_nested_summary_folds_into_parent() {
        let mut parent = ScanSummary { games_added: 2, ..Default::default() };
        let child = ScanSummary { games_added: 3, skipped: 1, ..Default::default() };

        parent += child;

        assert_eq!(parent.games_added, 5);
        assert_eq!(parent.skipped, 1);
    }
}
