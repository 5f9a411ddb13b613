// src/integrations/dialog.rs
//
// Human Decision Boundary
//
// The UI collaborator implements this trait. Every call blocks the worker
// until the user answers; implementations marshal onto their own UI thread.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::{DisambiguationChoice, GamePlatform, LibraryDef, SearchResult};
use crate::error::{AppError, AppResult};

/// A provider search came back empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoSearchResultsRequest {
    pub provider: String,
    pub name: String,
    pub path: PathBuf,
    pub platform: GamePlatform,
    pub can_proceed_without: bool,
}

/// A provider search returned several candidates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultipleSearchResultsRequest {
    pub provider: String,
    pub name: String,
    pub path: PathBuf,
    pub platform: GamePlatform,

    /// Newest release first, undated last
    pub results: Vec<SearchResult>,
    pub can_proceed_without: bool,
}

/// "Create a library from this directory?"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateLibraryRequest {
    pub path: PathBuf,
    pub children: Vec<PathBuf>,

    /// Suggested platform, inherited from the enclosing hierarchy
    pub platform: GamePlatform,
}

/// What the dialog answered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DialogResponse {
    /// Terminal answer
    Choice(DisambiguationChoice),

    /// The user wants to inspect a candidate before deciding; ask again afterwards
    ShowDetails(SearchResult),
}

#[cfg_attr(test, mockall::automock)]
pub trait DialogService: Send + Sync {
    fn no_search_results(&self, request: &NoSearchResultsRequest) -> AppResult<DialogResponse>;

    fn multiple_search_results(
        &self,
        request: &MultipleSearchResultsRequest,
    ) -> AppResult<DialogResponse>;

    fn show_details(&self, result: &SearchResult) -> AppResult<()>;

    /// `None` means the directory should not become a library
    fn create_library(&self, request: &CreateLibraryRequest) -> AppResult<Option<LibraryDef>>;

    /// Job-level failure notification
    fn show_error(&self, title: &str, error: &AppError);
}
