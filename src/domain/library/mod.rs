//! Critical Library Invariants:
//!
//! 1. A library is a directory plus a platform tag
//! 2. Library name cannot be empty
//! 3. Library path must be absolute
//! 4. A hierarchy is never empty while a scan is active
//! 5. A hierarchy's platform is its top-level library's platform

pub mod entity;
pub mod hierarchy;
pub mod invariants;

pub use entity::{Library, LibraryDef};
pub use hierarchy::LibraryHierarchy;
pub use invariants::validate_library;
