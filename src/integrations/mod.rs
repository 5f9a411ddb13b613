// src/integrations/mod.rs
//
// External Integrations Module
//
// Boundaries to collaborators outside the pipeline: metadata providers and
// the interactive UI.

pub mod dialog;
pub mod provider;

pub use dialog::{
    CreateLibraryRequest, DialogResponse, DialogService, MultipleSearchResultsRequest,
    NoSearchResultsRequest,
};
pub use provider::{GameInfoProvider, ProviderSettings};

#[cfg(test)]
pub use dialog::MockDialogService;
#[cfg(test)]
pub use provider::MockGameInfoProvider;
