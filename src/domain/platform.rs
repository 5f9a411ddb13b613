// src/domain/platform.rs

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::DomainError;

/// Platform a library (and therefore every game found under it) targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GamePlatform {
    #[default]
    Pc,
    Xbox360,
    XboxOne,
    Ps3,
    Ps4,
}

impl GamePlatform {
    pub const ALL: [GamePlatform; 5] = [
        GamePlatform::Pc,
        GamePlatform::Xbox360,
        GamePlatform::XboxOne,
        GamePlatform::Ps3,
        GamePlatform::Ps4,
    ];

    /// Stable key used for persistence and display
    pub fn key(&self) -> &'static str {
        match self {
            GamePlatform::Pc => "PC",
            GamePlatform::Xbox360 => "Xbox 360",
            GamePlatform::XboxOne => "Xbox One",
            GamePlatform::Ps3 => "PlayStation 3",
            GamePlatform::Ps4 => "PlayStation 4",
        }
    }
}

impl std::fmt::Display for GamePlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for GamePlatform {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GamePlatform::ALL
            .iter()
            .copied()
            .find(|p| p.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownPlatform(s.to_string()))
    }
}
