//! Error taxonomy for tab and storage operations.
//!
//! Every error here is surfaced synchronously to the user action that
//! triggered it; nothing is retried.

use std::fmt;

/// Errors produced by session, registry, and storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// A create or rename collided with an already-open tab name.
    /// The operation is aborted with no state mutated.
    DuplicateName(String),

    /// An operation referenced a tab that is not open. Not reachable from
    /// the normal key bindings; treated as a logic fault if it occurs.
    NotFound(String),

    /// Save, export, or find was invoked with no tab open.
    NoActiveTab,

    /// The durable store failed to read or write.
    Storage(String),
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::DuplicateName(name) => {
                write!(f, "a tab named '{}' already exists", name)
            }
            EditorError::NotFound(name) => write!(f, "no open tab named '{}'", name),
            EditorError::NoActiveTab => write!(f, "no tab is open"),
            EditorError::Storage(msg) => write!(f, "storage error: {}", msg),
        }
    }
}

impl std::error::Error for EditorError {}

pub type Result<T> = std::result::Result<T, EditorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_tab() {
        let err = EditorError::DuplicateName("notes.txt".to_string());
        assert!(err.to_string().contains("notes.txt"));

        let err = EditorError::NotFound("gone".to_string());
        assert!(err.to_string().contains("gone"));
    }
}
