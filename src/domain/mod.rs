// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file MUST declare all domain modules and re-export their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod excluded_path;
pub mod game;
pub mod library;
pub mod platform;
pub mod provider;
pub mod scan;
pub mod search;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Platform
pub use platform::GamePlatform;

// Game Domain
pub use game::{validate_game, Game};

// Library Domain
pub use library::{validate_library, Library, LibraryDef, LibraryHierarchy};

// Excluded Paths
pub use excluded_path::{validate_excluded_path, ExcludedPath};

// Provider records (value objects)
pub use provider::{GameInfo, SearchResult, UnifiedGameInfo};

// Search session state
pub use search::{DisambiguationChoice, SearchContext};

// Scan outcomes (value objects)
pub use scan::{
    JobStatus, PathClassification, Reconciliation, ResolveOutcome, ScanOutcome, ScanSummary,
};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("Library hierarchy is empty")]
    EmptyHierarchy,

    #[error("Entity not found: {0}")]
    NotFound(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
