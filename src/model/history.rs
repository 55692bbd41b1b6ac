//! Undo/redo snapshot stacks for the active document.
//!
//! The undo stack always holds at least one entry: the baseline, which is
//! the document's content at activation time. The top of the undo stack is
//! the current state. History is scoped to the active document only; a tab
//! switch replaces the whole tracker with a fresh baseline-only one.

/// Snapshot-based undo/redo tracker.
#[derive(Debug)]
pub struct History {
    undo: Vec<String>,
    redo: Vec<String>,
}

impl History {
    /// Start a fresh tracker whose baseline is `baseline`. The baseline is
    /// never discarded by `undo`.
    pub fn new(baseline: impl Into<String>) -> Self {
        Self {
            undo: vec![baseline.into()],
            redo: Vec::new(),
        }
    }

    /// The current state, i.e. the top of the undo stack.
    pub fn current(&self) -> &str {
        self.undo.last().expect("undo stack holds the baseline")
    }

    /// Record a new user edit. Clears the redo stack: once the user types
    /// after an undo, the undone future is gone.
    pub fn record(&mut self, snapshot: String) {
        self.undo.push(snapshot);
        self.redo.clear();
    }

    /// Step back one edit. Returns the state to show, or `None` when only
    /// the baseline remains (a no-op at the stack boundary).
    pub fn undo(&mut self) -> Option<&str> {
        if self.undo.len() <= 1 {
            return None;
        }
        let popped = self.undo.pop().expect("len checked above");
        self.redo.push(popped);
        Some(self.current())
    }

    /// Step forward one undone edit. Returns the state to show, or `None`
    /// when there is nothing to redo.
    pub fn redo(&mut self) -> Option<&str> {
        let state = self.redo.pop()?;
        self.undo.push(state);
        Some(self.current())
    }

    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_at_the_baseline_is_a_no_op() {
        let mut history = History::new("base");
        assert_eq!(history.undo(), None);
        assert_eq!(history.current(), "base");
    }

    #[test]
    fn n_edits_then_n_undos_restores_the_baseline() {
        let mut history = History::new("");
        history.record("a".to_string());
        history.record("ab".to_string());
        history.record("abc".to_string());

        assert_eq!(history.undo(), Some("ab"));
        assert_eq!(history.undo(), Some("a"));
        assert_eq!(history.undo(), Some(""));
        assert_eq!(history.undo(), None);
        assert_eq!(history.current(), "");
    }

    #[test]
    fn redo_restores_the_state_before_the_undo() {
        let mut history = History::new("");
        history.record("hello".to_string());

        assert_eq!(history.undo(), Some(""));
        assert_eq!(history.redo(), Some("hello"));
        assert_eq!(history.current(), "hello");
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn a_new_edit_clears_the_redo_stack() {
        let mut history = History::new("");
        history.record("first".to_string());
        history.undo();
        assert!(history.can_redo());

        history.record("second".to_string());
        assert!(!history.can_redo());
        assert_eq!(history.redo(), None);
        assert_eq!(history.current(), "second");
    }

    #[test]
    fn interleaved_undo_redo_walks_the_same_states() {
        let mut history = History::new("0");
        history.record("1".to_string());
        history.record("2".to_string());

        assert_eq!(history.undo(), Some("1"));
        assert_eq!(history.redo(), Some("2"));
        assert_eq!(history.undo(), Some("1"));
        assert_eq!(history.undo(), Some("0"));
        assert_eq!(history.redo(), Some("1"));
        assert_eq!(history.redo(), Some("2"));
    }
}
