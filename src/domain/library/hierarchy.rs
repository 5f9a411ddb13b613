// src/domain/library/hierarchy.rs
//
// Library Hierarchy - explicit walk state for nested sub-libraries.
//
// Owned by a single scan and passed down the recursion by `&mut`.

use crate::domain::library::Library;
use crate::domain::platform::GamePlatform;

/// Ordered stack of libraries rooted at a top-level library.
///
/// The root can never be popped, so the stack is never empty.
#[derive(Debug, Clone)]
pub struct LibraryHierarchy {
    stack: Vec<Library>,
}

impl LibraryHierarchy {
    pub fn new(root: Library) -> Self {
        Self { stack: vec![root] }
    }

    /// The innermost library
    pub fn current(&self) -> &Library {
        // Non-empty by construction
        &self.stack[self.stack.len() - 1]
    }

    pub fn root(&self) -> &Library {
        &self.stack[0]
    }

    /// Platform of the top-level library; sub-libraries never change it
    pub fn platform(&self) -> GamePlatform {
        self.root().platform
    }

    /// Enter a freshly created sub-library
    pub fn push(&mut self, library: Library) {
        self.stack.push(library);
    }

    /// Leave the innermost sub-library. Returns `None` at the root.
    pub fn pop(&mut self) -> Option<Library> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    /// Every library on the stack, root first
    pub fn libraries(&self) -> &[Library] {
        &self.stack
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
