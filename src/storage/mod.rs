//! Durable key-value storage and the document record layout on top of it.
//!
//! The editor persists each document under its own key and the theme choice
//! under a single fixed key. `RecordStore` owns that layout; the backends
//! below it only see opaque keys.

mod disk;
mod memory;

pub use disk::DiskStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// Prefix for per-document records. The rest of the key is the document id.
pub const DOC_PREFIX: &str = "doc/";

/// Fixed key holding the persisted theme name.
pub const THEME_KEY: &str = "theme";

/// A durable string-to-string store.
///
/// Mutations are write-through: when `set` or `remove` returns `Ok`, the
/// change is durable (or as durable as the backend gets).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Document records and the theme choice, keyed by document id.
///
/// A record's lifecycle is independent of the open tab: it is written on
/// explicit save or export, migrated on rename, and deleted when the tab
/// closes.
pub struct RecordStore<S> {
    inner: S,
}

impl<S: KeyValueStore> RecordStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    fn doc_key(name: &str) -> String {
        format!("{}{}", DOC_PREFIX, name)
    }

    /// Last-saved content for `name`, if any record exists.
    pub fn load(&self, name: &str) -> Option<String> {
        self.inner.get(&Self::doc_key(name))
    }

    pub fn save(&mut self, name: &str, content: &str) -> Result<()> {
        self.inner.set(&Self::doc_key(name), content)
    }

    pub fn delete(&mut self, name: &str) -> Result<()> {
        self.inner.remove(&Self::doc_key(name))
    }

    /// Move the record for `old` to `new`. Returns whether a record existed
    /// and was moved; when none exists the caller decides what to write
    /// under the new key.
    pub fn migrate(&mut self, old: &str, new: &str) -> Result<bool> {
        match self.load(old) {
            Some(content) => {
                self.save(new, &content)?;
                self.delete(old)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Persisted theme name, if one was ever saved.
    pub fn theme(&self) -> Option<String> {
        self.inner.get(THEME_KEY)
    }

    pub fn set_theme(&mut self, name: &str) -> Result<()> {
        self.inner.set(THEME_KEY, name)
    }
}
