// src/integrations/provider.rs
//
// Metadata Provider Boundary
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Implementations own their HTTP/JSON clients; the pipeline only sees
//   search and fetch
// - Calls are blocking from the caller's point of view
// - Failures surface as AppError::Provider, never as empty results

use serde::{Deserialize, Serialize};

use crate::domain::{GameInfo, GamePlatform, SearchResult};
use crate::error::AppResult;

/// How the pipeline treats a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Prefix for every status message about this provider
    pub display_name: String,

    /// A mandatory provider must yield data for a game to be added
    pub mandatory: bool,
}

impl ProviderSettings {
    pub fn primary(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            mandatory: true,
        }
    }

    pub fn secondary(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            mandatory: false,
        }
    }

    /// Offered to the dialog as a hint; only optional providers advertise it
    pub fn can_proceed_without(&self) -> bool {
        !self.mandatory
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self::primary("Provider")
    }
}

/// One external metadata source
#[cfg_attr(test, mockall::automock)]
pub trait GameInfoProvider: Send + Sync {
    fn settings(&self) -> ProviderSettings;

    fn search(&self, name: &str, platform: GamePlatform) -> AppResult<Vec<SearchResult>>;

    /// Resolve a search result's detail handle into a full record
    fn fetch(&self, result: &SearchResult) -> AppResult<GameInfo>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_optional_providers_advertise_proceed_without() {
        assert!(!ProviderSettings::primary("Metacritic").can_proceed_without());
        assert!(ProviderSettings::secondary("GiantBomb").can_proceed_without());
    }
}
