// events/types.rs
//
// All domain events in the system.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only the data needed to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::domain::{GamePlatform, JobStatus, ScanOutcome, ScanSummary};

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// CATALOG EVENTS
// ============================================================================

/// Emitted when a game is persisted and linked to its libraries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameAdded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub game_id: Uuid,
    pub name: String,
    pub path: PathBuf,
    pub platform: GamePlatform,
    pub library_ids: Vec<Uuid>,
}

impl GameAdded {
    pub fn new(
        game_id: Uuid,
        name: String,
        path: PathBuf,
        platform: GamePlatform,
        library_ids: Vec<Uuid>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            game_id,
            name,
            path,
            platform,
            library_ids,
        }
    }
}

impl DomainEvent for GameAdded {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "GameAdded" }
}

/// Emitted after a batch of games is removed from the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamesDeleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub game_ids: Vec<Uuid>,
}

impl GamesDeleted {
    pub fn new(game_ids: Vec<Uuid>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            game_ids,
        }
    }
}

impl DomainEvent for GamesDeleted {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "GamesDeleted" }
}

/// Emitted when a library (top-level or nested) is created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub library_id: Uuid,
    pub name: String,
    pub path: PathBuf,
    pub platform: GamePlatform,
}

impl LibraryCreated {
    pub fn new(library_id: Uuid, name: String, path: PathBuf, platform: GamePlatform) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            library_id,
            name,
            path,
            platform,
        }
    }
}

impl DomainEvent for LibraryCreated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "LibraryCreated" }
}

/// Emitted when a path is recorded as never-to-be-processed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathExcluded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub path: PathBuf,
}

impl PathExcluded {
    pub fn new(path: PathBuf) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            path,
        }
    }
}

impl DomainEvent for PathExcluded {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "PathExcluded" }
}

// ============================================================================
// SCAN EVENTS
// ============================================================================

/// Emitted exactly once per child path visited by a scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathProcessed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub path: PathBuf,
    pub outcome: ScanOutcome,
}

impl PathProcessed {
    pub fn new(path: PathBuf, outcome: ScanOutcome) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            path,
            outcome,
        }
    }
}

impl DomainEvent for PathProcessed {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "PathProcessed" }
}

/// Emitted when a top-level library finished refreshing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryRefreshed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub library_id: Uuid,
    pub summary: ScanSummary,
}

impl LibraryRefreshed {
    pub fn new(library_id: Uuid, summary: ScanSummary) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            library_id,
            summary,
        }
    }
}

impl DomainEvent for LibraryRefreshed {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "LibraryRefreshed" }
}

// ============================================================================
// JOB EVENTS
// ============================================================================

/// Emitted by the task runner when a job leaves the worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobFinished {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub job: String,
    pub status: JobStatus,
}

impl JobFinished {
    pub fn new(job: String, status: JobStatus) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            job,
            status,
        }
    }
}

impl DomainEvent for JobFinished {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "JobFinished" }
}
