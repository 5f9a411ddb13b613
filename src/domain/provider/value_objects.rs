// src/domain/provider/value_objects.rs
//
// Provider Value Objects
//
// CRITICAL INVARIANTS:
// - Immutable once built
// - No I/O
// - Merge is total: it never fails for valid inputs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ============================================================================
// SEARCH RESULT
// ============================================================================

/// A candidate match returned by a provider search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    pub release_date: Option<NaiveDate>,
    pub score: Option<f64>,

    /// Opaque, provider-specific locator used to fetch the full record
    pub detail_url: String,
}

impl SearchResult {
    pub fn new(name: impl Into<String>, detail_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            release_date: None,
            score: None,
            detail_url: detail_url.into(),
        }
    }

    pub fn with_release_date(mut self, release_date: NaiveDate) -> Self {
        self.release_date = Some(release_date);
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Newest first, undated results last
    pub fn cmp_release_date_desc(a: &SearchResult, b: &SearchResult) -> Ordering {
        match (a.release_date, b.release_date) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl std::fmt::Display for SearchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.release_date {
            Some(date) => write!(f, "{} ({})", self.name, date),
            None => write!(f, "{}", self.name),
        }
    }
}

// ============================================================================
// GAME INFO (PROVIDER-SPECIFIC RECORD)
// ============================================================================

/// Full game record as fetched from a single provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GameInfo {
    pub name: String,
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub critic_score: Option<f64>,
    pub user_score: Option<f64>,
    pub genres: Vec<String>,
    pub thumbnail: Option<Vec<u8>>,
    pub poster: Option<Vec<u8>>,
}

impl GameInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

// ============================================================================
// UNIFIED GAME INFO
// ============================================================================

/// Persistence-ready record merged from the mandatory primary provider and an
/// optional secondary provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UnifiedGameInfo {
    pub name: String,
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub critic_score: Option<f64>,
    pub user_score: Option<f64>,
    pub genres: Vec<String>,

    /// Score reported by the secondary provider, if any
    pub secondary_score: Option<f64>,

    /// Genre list reported by the secondary provider
    pub secondary_genres: Vec<String>,

    pub thumbnail: Option<Vec<u8>>,
    pub poster: Option<Vec<u8>>,
}

impl UnifiedGameInfo {
    /// Merge a primary record with an optional secondary one.
    ///
    /// Name, scores and genres always come from the primary. Optional
    /// descriptive fields fall back to the secondary only when the primary has
    /// none. The secondary contributes its own score and genre list.
    pub fn merge(primary: GameInfo, secondary: Option<GameInfo>) -> Self {
        let Some(secondary) = secondary else {
            return Self::from_primary(primary);
        };

        Self {
            name: primary.name,
            description: primary.description.or(secondary.description),
            release_date: primary.release_date.or(secondary.release_date),
            critic_score: primary.critic_score,
            user_score: primary.user_score,
            genres: primary.genres,
            secondary_score: secondary.critic_score.or(secondary.user_score),
            secondary_genres: secondary.genres,
            thumbnail: primary.thumbnail.or(secondary.thumbnail),
            poster: primary.poster.or(secondary.poster),
        }
    }

    fn from_primary(primary: GameInfo) -> Self {
        Self {
            name: primary.name,
            description: primary.description,
            release_date: primary.release_date,
            critic_score: primary.critic_score,
            user_score: primary.user_score,
            genres: primary.genres,
            secondary_score: None,
            secondary_genres: Vec::new(),
            thumbnail: primary.thumbnail,
            poster: primary.poster,
        }
    }
}
