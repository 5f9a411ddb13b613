// src/lib.rs
// GameDex - Local-first game library manager
//
// Architecture:
// - Domain-centric: entities, value objects and invariants live in `domain`
// - Event-driven: services publish facts on the EventBus after every write
// - Explicit: scan options and provider settings are values, never globals
// - Sequential: one job at a time on the TaskRunner worker
// - Collaborators (providers, UI dialogs) are traits implemented outside

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;

// ============================================================================
// PIPELINE
// ============================================================================

pub mod integrations;
pub mod services;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    validate_excluded_path,
    validate_game,
    validate_library,
    DisambiguationChoice,
    ExcludedPath,
    Game,
    GameInfo,
    GamePlatform,
    JobStatus,
    Library,
    LibraryDef,
    LibraryHierarchy,
    PathClassification,
    Reconciliation,
    ResolveOutcome,
    ScanOutcome,
    ScanSummary,
    SearchContext,
    SearchResult,
    UnifiedGameInfo,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus,
    DomainEvent,
    EventBus,
    EventLogEntry,
    GameAdded,
    GamesDeleted,
    JobFinished,
    LibraryCreated,
    LibraryRefreshed,
    PathExcluded,
    PathProcessed,
};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    ExcludedPathRepository,
    GameRepository,
    LibraryRepository,
    SqliteExcludedPathRepository,
    SqliteGameRepository,
    SqliteLibraryRepository,
};

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{
    CreateLibraryRequest,
    DialogResponse,
    DialogService,
    GameInfoProvider,
    MultipleSearchResultsRequest,
    NoSearchResultsRequest,
    ProviderSettings,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    CatalogService,
    FetchProgress,
    GameCatalog,
    GameInfoResolver,
    Job,
    JobHandle,
    LibraryScanner,
    PathClassifier,
    ProgressReporter,
    Reconciler,
    ScanOptions,
    TaskRunner,
};
