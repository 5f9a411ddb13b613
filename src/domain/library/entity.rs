use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::domain::platform::GamePlatform;

/// A user-designated root directory holding games of one platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    /// Internal immutable identifier
    pub id: Uuid,

    pub name: String,

    /// Root directory of the library
    pub path: PathBuf,

    pub platform: GamePlatform,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Library {
    pub fn new(name: String, path: PathBuf, platform: GamePlatform) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            path,
            platform,
            created_at: Utc::now(),
        }
    }
}

impl std::fmt::Display for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}'[{}]", self.name, self.platform)
    }
}

/// What the user answered to a "create library from this directory?" request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryDef {
    pub name: String,
    pub path: PathBuf,
    pub platform: GamePlatform,
}
