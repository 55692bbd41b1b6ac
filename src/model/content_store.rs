//! In-memory document contents.
//!
//! The content store is the source of truth for every document that is not
//! currently shown in the editing surface. The active document's entry is
//! kept in sync on every edit and on switch-out flush.

use std::collections::HashMap;

/// One open document. The id lives in the registry; this is the rest.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub content: String,
    /// Set on every edit, cleared when the document is persisted.
    pub dirty: bool,
}

/// Map from document id to its in-memory state.
#[derive(Debug, Default)]
pub struct ContentStore {
    docs: HashMap<String, Document>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.docs.get(id).map(|d| d.content.as_str())
    }

    pub fn is_dirty(&self, id: &str) -> bool {
        self.docs.get(id).map(|d| d.dirty).unwrap_or(false)
    }

    /// Insert or replace a document without touching its dirty flag
    /// history; newly inserted documents start clean.
    pub fn insert(&mut self, id: &str, content: String) {
        debug_assert!(!id.is_empty(), "document ids must be non-empty");
        self.docs.insert(
            id.to_string(),
            Document {
                content,
                dirty: false,
            },
        );
    }

    /// Overwrite content and mark the document dirty. Missing ids are
    /// created; callers keep ids in step with the registry.
    pub fn set(&mut self, id: &str, content: String) {
        debug_assert!(!id.is_empty(), "document ids must be non-empty");
        let doc = self.docs.entry(id.to_string()).or_default();
        doc.content = content;
        doc.dirty = true;
    }

    pub fn mark_clean(&mut self, id: &str) {
        if let Some(doc) = self.docs.get_mut(id) {
            doc.dirty = false;
        }
    }

    pub fn delete(&mut self, id: &str) -> Option<Document> {
        self.docs.remove(id)
    }

    /// Move a document to a new id, preserving content and dirty flag.
    pub fn rename(&mut self, old: &str, new: &str) {
        debug_assert!(!new.is_empty(), "document ids must be non-empty");
        if let Some(doc) = self.docs.remove(old) {
            self.docs.insert(new.to_string(), doc);
        }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}
