// src/events/mod.rs
//
// Internal Event System - Public API
//
// CRITICAL: the type-erased handler alias stays private to the bus module

pub mod bus;
pub mod types;

pub use bus::{EventBus, EventLogEntry};

pub use types::{
    DomainEvent,

    // Catalog
    GameAdded,
    GamesDeleted,
    LibraryCreated,
    PathExcluded,

    // Scan
    LibraryRefreshed,
    PathProcessed,

    // Jobs
    JobFinished,
};

/// Initialize a new event bus
pub fn create_event_bus() -> EventBus {
    EventBus::new()
}
