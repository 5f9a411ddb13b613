//! Critical Game Invariants:
//!
//! 1. A game is backed by exactly one directory on disk
//! 2. Path must be absolute
//! 3. Name cannot be empty
//! 4. A game can belong to several libraries (nested sub-libraries)

pub mod entity;
pub mod invariants;

pub use entity::Game;
pub use invariants::validate_game;
