use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::domain::platform::GamePlatform;
use crate::domain::provider::UnifiedGameInfo;

/// A game mapped to a directory inside some library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// Internal immutable identifier
    pub id: Uuid,

    /// Directory backing this game
    pub path: PathBuf,

    pub platform: GamePlatform,

    /// Metadata merged from the providers
    pub info: UnifiedGameInfo,

    /// When this game was added to the catalog
    pub added_at: DateTime<Utc>,
}

impl Game {
    pub fn new(info: UnifiedGameInfo, path: PathBuf, platform: GamePlatform) -> Self {
        Self {
            id: Uuid::new_v4(),
            path,
            platform,
            info,
            added_at: Utc::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// True when the backing directory is gone from disk
    pub fn is_obsolete(&self) -> bool {
        !Path::new(&self.path).exists()
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' [{}]", self.info.name, self.platform)
    }
}
