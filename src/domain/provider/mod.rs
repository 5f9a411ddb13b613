// src/domain/provider/mod.rs
//
// Provider records - immutable values produced by metadata providers
// and the unified record built from them.

pub mod value_objects;

pub use value_objects::{GameInfo, SearchResult, UnifiedGameInfo};
