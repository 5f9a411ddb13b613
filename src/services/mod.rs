// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod catalog_service;
pub mod game_info_resolver;
pub mod library_scanner;
pub mod path_classifier;
pub mod progress;
pub mod reconciler;
pub mod task_runner;


// Re-export all services and their types
pub use catalog_service::{CatalogService, GameCatalog};

pub use path_classifier::{child_directories, is_library_candidate, PathClassifier};

pub use game_info_resolver::{GameInfoResolver, ResolveTarget, ScanOptions};

pub use reconciler::Reconciler;

pub use library_scanner::{LibraryScanner, NameRules};

pub use progress::{FetchProgress, ProgressReporter};

pub use task_runner::{Job, JobHandle, TaskRunner};

#[cfg(test)]
pub use catalog_service::MockGameCatalog;
