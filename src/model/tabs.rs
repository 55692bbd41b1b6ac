//! The ordered registry of open tabs.
//!
//! Insertion order is display order. At most one tab is active, and the
//! active id is always present in the order. Ids are unique among open
//! tabs; collisions are rejected before anything mutates.

use crate::error::{EditorError, Result};

/// Prefix used for synthesized tab names.
pub const UNTITLED_PREFIX: &str = "Untitled-";

#[derive(Debug, Default)]
pub struct TabRegistry {
    order: Vec<String>,
    active: Option<String>,
    /// Next `Untitled-N` suffix. Monotonic for the session, never reused,
    /// and bumped past any suffix observed in an inserted name.
    next_untitled: u32,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            active: None,
            next_untitled: 1,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.order.iter().any(|t| t == id)
    }

    /// Open tab ids in display order.
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Synthesize the next `Untitled-N` name.
    pub fn next_untitled(&mut self) -> String {
        let name = format!("{}{}", UNTITLED_PREFIX, self.next_untitled);
        self.next_untitled += 1;
        name
    }

    /// Append a tab at the end of the display order.
    pub fn insert(&mut self, id: &str) -> Result<()> {
        if self.contains(id) {
            return Err(EditorError::DuplicateName(id.to_string()));
        }
        self.note_untitled(id);
        self.order.push(id.to_string());
        Ok(())
    }

    /// Remove a tab. If it was active, the first remaining tab in order
    /// becomes active, or none if the registry is now empty.
    pub fn remove(&mut self, id: &str) -> Result<()> {
        let idx = self
            .order
            .iter()
            .position(|t| t == id)
            .ok_or_else(|| EditorError::NotFound(id.to_string()))?;
        self.order.remove(idx);
        if self.active.as_deref() == Some(id) {
            self.active = self.order.first().cloned();
        }
        Ok(())
    }

    /// Rename a tab in place, preserving its display position and the
    /// active pointer.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        let idx = self
            .order
            .iter()
            .position(|t| t == old)
            .ok_or_else(|| EditorError::NotFound(old.to_string()))?;
        if new != old && self.contains(new) {
            return Err(EditorError::DuplicateName(new.to_string()));
        }
        self.note_untitled(new);
        self.order[idx] = new.to_string();
        if self.active.as_deref() == Some(old) {
            self.active = Some(new.to_string());
        }
        Ok(())
    }

    pub fn set_active(&mut self, id: &str) -> Result<()> {
        if !self.contains(id) {
            return Err(EditorError::NotFound(id.to_string()));
        }
        self.active = Some(id.to_string());
        Ok(())
    }

    /// The tab after `id` in display order, wrapping around.
    pub fn next_after(&self, id: &str) -> Option<&str> {
        let idx = self.order.iter().position(|t| t == id)?;
        self.order
            .get((idx + 1) % self.order.len())
            .map(String::as_str)
    }

    /// The tab before `id` in display order, wrapping around.
    pub fn prev_before(&self, id: &str) -> Option<&str> {
        let idx = self.order.iter().position(|t| t == id)?;
        let len = self.order.len();
        self.order.get((idx + len - 1) % len).map(String::as_str)
    }

    /// Keep the untitled counter ahead of any `Untitled-N` name that shows
    /// up, so reopening persisted tabs never mints a colliding name.
    fn note_untitled(&mut self, id: &str) {
        if let Some(suffix) = id.strip_prefix(UNTITLED_PREFIX) {
            if let Ok(n) = suffix.parse::<u32>() {
                if n >= self.next_untitled {
                    self.next_untitled = n + 1;
                }
            }
        }
    }
}
