// src/domain/search.rs
//
// Search session state shared by every provider call made for one path.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::provider::SearchResult;

/// Accumulates candidate names the user already rejected for the current path.
///
/// Names are only ever added. A context is created fresh per path and shared
/// across the primary and secondary provider calls for that path.
#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    excluded_names: HashSet<String>,
}

impl SearchContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exclude<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_names.extend(names.into_iter().map(Into::into));
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_names.contains(name)
    }

    pub fn excluded_names(&self) -> &HashSet<String> {
        &self.excluded_names
    }

    pub fn is_empty(&self) -> bool {
        self.excluded_names.is_empty()
    }
}

/// The terminal answer of the disambiguation collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DisambiguationChoice {
    /// Leave the path alone for now; it stays re-processable
    Skip,

    /// Never process this path again
    Exclude,

    /// Continue without this provider's data
    ProceedWithout,

    /// Search again under a different name
    NewName(String),

    /// Use this search result
    Select(SearchResult),
}

impl std::fmt::Display for DisambiguationChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisambiguationChoice::Skip => write!(f, "skip"),
            DisambiguationChoice::Exclude => write!(f, "exclude"),
            DisambiguationChoice::ProceedWithout => write!(f, "proceed without"),
            DisambiguationChoice::NewName(name) => write!(f, "new name '{}'", name),
            DisambiguationChoice::Select(result) => write!(f, "select '{}'", result.name),
        }
    }
}
