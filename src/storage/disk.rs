//! Disk-backed key-value store.
//!
//! All keys live in one JSON object file under the data directory. The map
//! is loaded once at construction and rewritten in full on every mutation;
//! at the sizes this editor deals with that is cheaper than getting
//! incremental persistence right.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{EditorError, Result};
use crate::storage::KeyValueStore;

pub struct DiskStore {
    path: PathBuf,
    map: BTreeMap<String, String>,
}

impl DiskStore {
    /// Open the store at `path`, reading any existing contents.
    ///
    /// A missing file yields an empty store. A file that exists but fails
    /// to parse also yields an empty store, with a warning; the old file is
    /// overwritten on the next mutation.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let map = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}, starting empty", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(EditorError::Storage(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        };
        Ok(Self { path, map })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn write_through(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| EditorError::Storage(format!("{}: {}", parent.display(), e)))?;
        }
        let json = serde_json::to_string_pretty(&self.map)
            .map_err(|e| EditorError::Storage(e.to_string()))?;
        std::fs::write(&self.path, json)
            .map_err(|e| EditorError::Storage(format!("{}: {}", self.path.display(), e)))
    }
}

impl KeyValueStore for DiskStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.map.insert(key.to_string(), value.to_string());
        self.write_through()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.map.remove(key).is_some() {
            self.write_through()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_on_a_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = DiskStore::open(dir.path().join("records.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn mutations_survive_a_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");

        let mut store = DiskStore::open(&path).unwrap();
        store.set("doc/a", "alpha").unwrap();
        store.set("doc/b", "beta").unwrap();
        store.remove("doc/a").unwrap();

        let reopened = DiskStore::open(&path).unwrap();
        assert_eq!(reopened.get("doc/a"), None);
        assert_eq!(reopened.get("doc/b").as_deref(), Some("beta"));
    }

    #[test]
    fn corrupt_file_falls_back_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, "not json at all {{").unwrap();

        let store = DiskStore::open(&path).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn removing_a_missing_key_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let mut store = DiskStore::open(dir.path().join("records.json")).unwrap();
        store.remove("doc/never-written").unwrap();
        assert!(store.is_empty());
    }
}
