//! Navigation state machine over the folder tree.
//!
//! # Invariants
//! - Starts at the root.
//! - `enter` lengthens the location by one segment, `back` shortens it by
//!   one; the reachable graph is a tree.
//! - `back` at the root is a no-op.

use crate::model::location::{Location, NameError};

/// Tracks the currently open location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    current: Location,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &Location {
        &self.current
    }

    pub fn is_at_root(&self) -> bool {
        self.current.is_root()
    }

    /// Moves into `folder_name` without checking that it exists.
    pub fn enter(&mut self, folder_name: &str) -> Result<&Location, NameError> {
        self.current = self.current.child(folder_name)?;
        Ok(&self.current)
    }

    /// Moves to the parent. Returns `false` when already at the root.
    pub fn back(&mut self) -> bool {
        match self.current.parent() {
            Some(parent) => {
                self.current = parent;
                true
            }
            None => false,
        }
    }

    /// Jumps back to the root.
    pub fn reset(&mut self) {
        self.current = Location::root();
    }
}
