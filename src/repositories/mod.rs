// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - NO event emission
// - NO cross-repository calls
// - Explicit SQL only

pub mod excluded_path_repository;
pub mod game_repository;
pub mod library_repository;

pub use excluded_path_repository::{ExcludedPathRepository, SqliteExcludedPathRepository};
pub use game_repository::{GameRepository, SqliteGameRepository};
pub use library_repository::{LibraryRepository, SqliteLibraryRepository};

use chrono::{DateTime, Utc};
use std::path::Path;
use uuid::Uuid;

/// Paths are stored as their lossless-enough string form
pub(crate) fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Wrap a column decoding failure so it surfaces as an explicit rusqlite error
pub(crate) fn conversion_error(
    column: usize,
    message: String,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        rusqlite::types::Type::Text,
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
    )
}

pub(crate) fn parse_uuid(column: usize, value: &str) -> Result<Uuid, rusqlite::Error> {
    Uuid::parse_str(value)
        .map_err(|e| conversion_error(column, format!("Invalid UUID '{}': {}", value, e)))
}

pub(crate) fn parse_timestamp(column: usize, value: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(column, format!("Invalid timestamp '{}': {}", value, e)))
}

#[cfg(test)]
mod error_propagation_tests {
    use super::*;

    /// PROVES: Invalid UUID causes explicit error, not Uuid::nil()
    #[test]
    fn test_invalid_uuid_causes_error() {
        let result = parse_uuid(0, "not-a-valid-uuid");
        assert!(matches!(result, Err(rusqlite::Error::FromSqlConversionFailure(0, _, _))));
    }

    /// PROVES: Invalid timestamp causes explicit error, not Utc::now()
    #[test]
    fn test_invalid_timestamp_causes_error() {
        let result = parse_timestamp(3, "yesterday");
        assert!(matches!(result, Err(rusqlite::Error::FromSqlConversionFailure(3, _, _))));
    }
}
