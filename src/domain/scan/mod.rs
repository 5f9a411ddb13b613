// src/domain/scan/mod.rs
//
// Scan Domain
//
// Value objects describing what happened to each path during a scan.
// No persistence, no event emission (that's the service's job).

pub mod value_objects;

pub use value_objects::{
    JobStatus,
    PathClassification,
    Reconciliation,
    ResolveOutcome,
    ScanOutcome,
    ScanSummary,
};
