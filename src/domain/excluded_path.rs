// src/domain/excluded_path.rs
//
// Excluded Path Entity
//
// A directory the user chose never to process again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedPath {
    /// Internal identifier
    pub id: Uuid,

    pub path: PathBuf,

    /// When the exclusion was recorded
    pub created_at: DateTime<Utc>,
}

impl ExcludedPath {
    pub fn new(path: PathBuf) -> Self {
        Self {
            id: Uuid::new_v4(),
            path,
            created_at: Utc::now(),
        }
    }
}

/// Validates ExcludedPath invariants
pub fn validate_excluded_path(excluded: &ExcludedPath) -> DomainResult<()> {
    if excluded.path.as_os_str().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Excluded path cannot be empty".to_string(),
        ));
    }
    Ok(())
}
