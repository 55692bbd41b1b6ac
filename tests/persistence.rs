//! Durability scenarios over the disk-backed store: what survives a process
//! restart is exactly the explicitly persisted records plus the theme.

use alactic::model::{Origin, Session};
use alactic::storage::{DiskStore, KeyValueStore, RecordStore};

use tempfile::TempDir;

fn open_session(path: &std::path::Path) -> Session<DiskStore> {
    Session::new(RecordStore::new(DiskStore::open(path).unwrap()))
}

#[test]
fn saved_documents_survive_a_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("records.json");

    {
        let mut s = open_session(&path);
        s.create(Some("notes.txt")).unwrap();
        s.edit("remember me", Origin::User);
        s.persist_active().unwrap();
        s.create(Some("scratch")).unwrap();
        s.edit("never saved", Origin::User);
    }

    let mut s = open_session(&path);
    s.create(Some("notes.txt")).unwrap();
    assert_eq!(s.surface(), "remember me");

    s.create(Some("scratch")).unwrap();
    assert_eq!(s.surface(), "", "unsaved edits did not survive");
}

#[test]
fn rename_migration_is_durable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("records.json");

    {
        let mut s = open_session(&path);
        s.create(Some("draft")).unwrap();
        s.edit("body", Origin::User);
        s.persist_active().unwrap();
        s.rename("draft", "final").unwrap();
    }

    let records = RecordStore::new(DiskStore::open(&path).unwrap());
    assert_eq!(records.load("draft"), None);
    assert_eq!(records.load("final").as_deref(), Some("body"));
}

#[test]
fn closing_a_tab_deletes_its_record_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("records.json");

    {
        let mut s = open_session(&path);
        s.create(Some("gone")).unwrap();
        s.edit("soon deleted", Origin::User);
        s.persist_active().unwrap();
        s.close("gone").unwrap();
    }

    let records = RecordStore::new(DiskStore::open(&path).unwrap());
    assert_eq!(records.load("gone"), None);
}

#[test]
fn the_theme_choice_survives_a_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("records.json");

    {
        let mut records = RecordStore::new(DiskStore::open(&path).unwrap());
        records.set_theme("dark").unwrap();
    }

    let records = RecordStore::new(DiskStore::open(&path).unwrap());
    assert_eq!(records.theme().as_deref(), Some("dark"));
}

#[test]
fn a_corrupt_store_file_starts_empty_instead_of_failing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("records.json");
    std::fs::write(&path, "not json at all").unwrap();

    let store = DiskStore::open(&path).unwrap();
    assert!(store.is_empty());

    // The next mutation overwrites the corrupt file with valid JSON.
    let mut records = RecordStore::new(store);
    records.save("a", "fresh").unwrap();
    let reopened = DiskStore::open(&path).unwrap();
    assert_eq!(reopened.get("doc/a").as_deref(), Some("fresh"));
}

#[test]
fn the_store_file_is_created_lazily_in_a_missing_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("records.json");

    let mut s = open_session(&path);
    s.create(Some("a")).unwrap();
    s.edit("x", Origin::User);
    s.persist_active().unwrap();

    assert!(path.exists());
}
