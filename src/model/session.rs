//! The editor session: the single editing surface and everything behind it.
//!
//! `Session` owns the tab registry, the content store, the undo/redo
//! tracker for the active document, and the persistence adapter. All
//! multi-structure updates (create, rename, close, activate) go through it
//! so a stale id can never be left behind in one structure; a stale id
//! anywhere is silent data loss.
//!
//! Switching tabs is flush-then-load: the surface text is written back into
//! the outgoing document's content store entry, then the incoming
//! document's content replaces the surface and the history tracker is reset
//! to a fresh baseline. Undo history deliberately does not survive a switch
//! in either direction.

use crate::error::{EditorError, Result};
use crate::model::content_store::ContentStore;
use crate::model::history::History;
use crate::model::tabs::TabRegistry;
use crate::storage::{KeyValueStore, RecordStore};

/// Where a surface mutation came from. Replayed undo/redo writes must not
/// be recorded as new edits, so every mutation carries its origin instead
/// of the session guarding with a shared flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    User,
    Replay,
}

pub struct Session<S> {
    contents: ContentStore,
    tabs: TabRegistry,
    history: History,
    surface: String,
    records: RecordStore<S>,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(records: RecordStore<S>) -> Self {
        Self {
            contents: ContentStore::new(),
            tabs: TabRegistry::new(),
            history: History::new(""),
            surface: String::new(),
            records,
        }
    }

    /// Open a new tab and make it active.
    ///
    /// An omitted (or blank) name synthesizes `Untitled-N`. An explicit
    /// name that collides with an open tab fails with `DuplicateName` and
    /// mutates nothing. The new document adopts a matching persisted
    /// record, else starts empty.
    pub fn create(&mut self, name: Option<&str>) -> Result<String> {
        let id = match name.map(str::trim) {
            Some(n) if !n.is_empty() => {
                if self.tabs.contains(n) {
                    return Err(EditorError::DuplicateName(n.to_string()));
                }
                n.to_string()
            }
            _ => self.tabs.next_untitled(),
        };
        let seed = self.records.load(&id).unwrap_or_default();
        self.tabs.insert(&id)?;
        self.contents.insert(&id, seed);
        self.switch_to(&id)?;
        tracing::info!(tab = %id, "created tab");
        Ok(id)
    }

    /// Open an explicit payload (a file read from disk) under `name`.
    ///
    /// If a tab with that name is already open it is activated and its
    /// content replaced as a user edit; otherwise a new tab is created
    /// seeded with the payload. The payload wins over any persisted record.
    pub fn open_payload(&mut self, name: &str, content: &str) -> Result<String> {
        let name = name.trim();
        if !name.is_empty() && self.tabs.contains(name) {
            self.activate(name)?;
            self.edit(content, Origin::User);
            return Ok(name.to_string());
        }
        let id = if name.is_empty() {
            self.tabs.next_untitled()
        } else {
            name.to_string()
        };
        self.tabs.insert(&id)?;
        self.contents.insert(&id, content.to_string());
        self.switch_to(&id)?;
        tracing::info!(tab = %id, bytes = content.len(), "opened file payload");
        Ok(id)
    }

    /// Rename an open tab, migrating its persisted record.
    ///
    /// Fails with `DuplicateName` when the new name is already an open tab
    /// or an existing persisted record; either way the rename would clobber
    /// somebody else's content. A blank or unchanged new name is a no-op.
    /// The durable move happens before any in-memory update so a storage
    /// failure leaves the session untouched.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        if !self.tabs.contains(old) {
            return Err(EditorError::NotFound(old.to_string()));
        }
        let new = new.trim();
        if new.is_empty() || new == old {
            return Ok(());
        }
        if self.tabs.contains(new) || self.records.load(new).is_some() {
            return Err(EditorError::DuplicateName(new.to_string()));
        }

        if !self.records.migrate(old, new)? {
            // No record under the old name yet: persist the current
            // content under the new one, like the original rename path.
            let content = if self.tabs.active() == Some(old) {
                self.surface.clone()
            } else {
                self.contents.get(old).unwrap_or_default().to_string()
            };
            self.records.save(new, &content)?;
        }
        self.contents.rename(old, new);
        self.tabs.rename(old, new)?;
        tracing::info!(from = %old, to = %new, "renamed tab");
        Ok(())
    }

    /// Close a tab, deleting its content store entry and persisted record.
    ///
    /// If it was active, the first remaining tab in display order becomes
    /// active; with no tabs left the surface empties and further switches
    /// are no-ops until a tab is created.
    pub fn close(&mut self, id: &str) -> Result<()> {
        if !self.tabs.contains(id) {
            return Err(EditorError::NotFound(id.to_string()));
        }
        self.records.delete(id)?;
        let was_active = self.tabs.active() == Some(id);
        self.tabs.remove(id)?;
        self.contents.delete(id);
        if was_active {
            match self.tabs.active().map(String::from) {
                Some(next) => self.load(&next),
                None => {
                    self.surface.clear();
                    self.history = History::new("");
                }
            }
        }
        tracing::info!(tab = %id, remaining = self.tabs.len(), "closed tab");
        Ok(())
    }

    /// Make `id` the active tab, flushing the outgoing document first.
    pub fn activate(&mut self, id: &str) -> Result<()> {
        if !self.tabs.contains(id) {
            return Err(EditorError::NotFound(id.to_string()));
        }
        self.switch_to(id)
    }

    /// Apply new surface text. User edits record a history snapshot;
    /// replayed undo/redo writes do not. With no tab open this is a no-op.
    pub fn edit(&mut self, text: &str, origin: Origin) {
        let Some(id) = self.tabs.active().map(String::from) else {
            return;
        };
        self.surface = text.to_string();
        self.contents.set(&id, self.surface.clone());
        if origin == Origin::User {
            self.history.record(self.surface.clone());
        }
    }

    /// Step the active document back one edit. Returns whether anything
    /// changed; at the baseline this is a no-op.
    pub fn undo(&mut self) -> bool {
        let Some(text) = self.history.undo().map(str::to_string) else {
            return false;
        };
        self.edit(&text, Origin::Replay);
        true
    }

    /// Reapply the most recently undone edit, if any.
    pub fn redo(&mut self) -> bool {
        let Some(text) = self.history.redo().map(str::to_string) else {
            return false;
        };
        self.edit(&text, Origin::Replay);
        true
    }

    /// Write the active document's surface text to its persisted record.
    /// Returns the id for status display.
    pub fn persist_active(&mut self) -> Result<String> {
        let Some(id) = self.tabs.active().map(String::from) else {
            return Err(EditorError::NoActiveTab);
        };
        self.records.save(&id, &self.surface)?;
        self.contents.mark_clean(&id);
        tracing::info!(tab = %id, bytes = self.surface.len(), "persisted record");
        Ok(id)
    }

    pub fn surface(&self) -> &str {
        &self.surface
    }

    pub fn active(&self) -> Option<&str> {
        self.tabs.active()
    }

    pub fn tabs(&self) -> &TabRegistry {
        &self.tabs
    }

    pub fn is_dirty(&self, id: &str) -> bool {
        self.contents.is_dirty(id)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn records(&self) -> &RecordStore<S> {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut RecordStore<S> {
        &mut self.records
    }

    /// Flush-then-load. The flush always precedes the load; switching to
    /// the already-active tab is a no-op and keeps its undo history.
    fn switch_to(&mut self, id: &str) -> Result<()> {
        if self.tabs.active() == Some(id) {
            return Ok(());
        }
        if let Some(prev) = self.tabs.active().map(String::from) {
            if self.contents.get(&prev) != Some(self.surface.as_str()) {
                self.contents.set(&prev, self.surface.clone());
            }
        }
        self.tabs.set_active(id)?;
        self.load(id);
        Ok(())
    }

    /// Replace the surface with `id`'s content and reset the history
    /// tracker to a baseline-only stack.
    fn load(&mut self, id: &str) {
        self.surface = self.contents.get(id).unwrap_or_default().to_string();
        self.history = History::new(self.surface.clone());
        tracing::debug!(tab = %id, "loaded document into surface");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn session() -> Session<MemoryStore> {
        Session::new(RecordStore::new(MemoryStore::new()))
    }

    #[test]
    fn create_activates_and_seeds_an_empty_surface() {
        let mut s = session();
        let id = s.create(None).unwrap();
        assert_eq!(id, "Untitled-1");
        assert_eq!(s.active(), Some("Untitled-1"));
        assert_eq!(s.surface(), "");
    }

    #[test]
    fn create_adopts_a_matching_persisted_record() {
        let mut s = session();
        s.records_mut().save("notes.txt", "recovered").unwrap();

        s.create(Some("notes.txt")).unwrap();
        assert_eq!(s.surface(), "recovered");
    }

    #[test]
    fn explicit_duplicate_create_mutates_nothing() {
        let mut s = session();
        s.create(Some("a")).unwrap();
        s.edit("text", Origin::User);

        assert_eq!(
            s.create(Some("a")),
            Err(EditorError::DuplicateName("a".to_string()))
        );
        assert_eq!(s.tabs().len(), 1);
        assert_eq!(s.surface(), "text");
    }

    #[test]
    fn edit_with_no_tab_open_is_a_no_op() {
        let mut s = session();
        s.edit("ignored", Origin::User);
        assert_eq!(s.surface(), "");
        assert!(!s.undo());
    }

    #[test]
    fn flush_precedes_load_on_switch() {
        let mut s = session();
        s.create(Some("a")).unwrap();
        s.edit("alpha", Origin::User);
        s.create(Some("b")).unwrap();
        assert_eq!(s.surface(), "");

        s.edit("beta", Origin::User);
        s.activate("a").unwrap();
        assert_eq!(s.surface(), "alpha");

        s.activate("b").unwrap();
        assert_eq!(s.surface(), "beta");
    }

    #[test]
    fn activating_the_active_tab_keeps_undo_history() {
        let mut s = session();
        s.create(Some("a")).unwrap();
        s.edit("x", Origin::User);

        s.activate("a").unwrap();
        assert!(s.can_undo());
    }

    #[test]
    fn replayed_writes_do_not_record_history() {
        let mut s = session();
        s.create(Some("a")).unwrap();
        s.edit("one", Origin::User);
        s.edit("two", Origin::User);

        assert!(s.undo());
        assert_eq!(s.surface(), "one");
        // The replay above must not have pushed a new undo entry.
        assert!(s.undo());
        assert_eq!(s.surface(), "");
        assert!(!s.undo());
    }

    #[test]
    fn rename_migrates_the_persisted_record() {
        let mut s = session();
        s.create(Some("a")).unwrap();
        s.edit("body", Origin::User);
        s.persist_active().unwrap();

        s.rename("a", "b").unwrap();
        assert_eq!(s.records().load("a"), None);
        assert_eq!(s.records().load("b").as_deref(), Some("body"));
        assert_eq!(s.active(), Some("b"));
        assert_eq!(s.surface(), "body");
    }

    #[test]
    fn rename_without_a_record_persists_under_the_new_name() {
        let mut s = session();
        s.create(Some("a")).unwrap();
        s.edit("draft", Origin::User);

        s.rename("a", "b").unwrap();
        assert_eq!(s.records().load("b").as_deref(), Some("draft"));
    }

    #[test]
    fn rename_onto_an_existing_record_is_rejected() {
        let mut s = session();
        s.records_mut().save("notes.txt", "old").unwrap();
        s.create(None).unwrap();
        s.edit("abc", Origin::User);

        assert_eq!(
            s.rename("Untitled-1", "notes.txt"),
            Err(EditorError::DuplicateName("notes.txt".to_string()))
        );
        assert_eq!(s.active(), Some("Untitled-1"));
        assert_eq!(s.surface(), "abc");
        assert_eq!(s.records().load("notes.txt").as_deref(), Some("old"));
    }

    #[test]
    fn blank_rename_is_a_no_op() {
        let mut s = session();
        s.create(Some("a")).unwrap();
        s.rename("a", "  ").unwrap();
        assert_eq!(s.active(), Some("a"));
    }

    #[test]
    fn close_deletes_the_persisted_record() {
        let mut s = session();
        s.create(Some("a")).unwrap();
        s.edit("text", Origin::User);
        s.persist_active().unwrap();

        s.close("a").unwrap();
        assert_eq!(s.records().load("a"), None);
        assert_eq!(s.active(), None);
        assert_eq!(s.surface(), "");
    }

    #[test]
    fn persist_with_no_tab_is_an_error() {
        let mut s = session();
        assert_eq!(s.persist_active(), Err(EditorError::NoActiveTab));
    }

    #[test]
    fn persist_clears_the_dirty_flag() {
        let mut s = session();
        s.create(Some("a")).unwrap();
        s.edit("text", Origin::User);
        assert!(s.is_dirty("a"));

        s.persist_active().unwrap();
        assert!(!s.is_dirty("a"));
    }

    #[test]
    fn open_payload_replaces_an_existing_tabs_content() {
        let mut s = session();
        s.create(Some("notes.txt")).unwrap();
        s.edit("stale", Origin::User);
        s.create(Some("other")).unwrap();

        s.open_payload("notes.txt", "from disk").unwrap();
        assert_eq!(s.active(), Some("notes.txt"));
        assert_eq!(s.surface(), "from disk");
        // Replacing the content was a user edit: undo goes back to what
        // the tab held before the import.
        assert!(s.undo());
        assert_eq!(s.surface(), "stale");
    }

    #[test]
    fn open_payload_wins_over_a_persisted_record() {
        let mut s = session();
        s.records_mut().save("f.txt", "persisted").unwrap();
        s.open_payload("f.txt", "payload").unwrap();
        assert_eq!(s.surface(), "payload");
    }
}
