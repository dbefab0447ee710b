use chrono::{Duration, Utc};
use tempfile::tempdir;

use super::*;
use crate::algorithm::SigningAlgorithm;
use crate::error::KeyError;
use crate::keygen::{KeyFactory, SystemKeyFactory};
use crate::record::KeyRecord;

fn fresh_record() -> KeyRecord {
    let key_pair = SystemKeyFactory::new()
        .generate(SigningAlgorithm::ES256)
        .unwrap();
    KeyRecord::new(&key_pair, SigningAlgorithm::ES256).unwrap()
}

fn record_aged_days(days: i64) -> KeyRecord {
    let mut record = fresh_record();
    record.creation_date = Utc::now() - Duration::days(days);
    record
}

#[test]
fn test_memory_save_then_current() {
    let store = InMemoryStore::new();
    let record = fresh_record();

    store.save(&record).unwrap();

    assert_eq!(store.current().unwrap(), record);
}

#[test]
fn test_memory_current_on_empty_store() {
    let store = InMemoryStore::new();

    let result = store.current();

    assert!(matches!(result, Err(KeyError::NotFound { .. })));
}

#[test]
fn test_memory_save_demotes_previous_current() {
    let store = InMemoryStore::new();
    let first = record_aged_days(1);
    let second = fresh_record();

    store.save(&first).unwrap();
    store.save(&second).unwrap();

    assert_eq!(store.current().unwrap(), second);

    // History keeps the demoted key retrievable
    let recent = store.recent(5).unwrap();
    assert_eq!(recent, vec![second, first]);
}

#[test]
fn test_memory_recent_includes_current_and_history() {
    let store = InMemoryStore::new();
    let oldest = record_aged_days(3);
    let middle = record_aged_days(1);
    let newest = fresh_record();

    store.save(&oldest).unwrap();
    store.save(&middle).unwrap();
    store.save(&newest).unwrap();

    let recent = store.recent(10).unwrap();
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0], newest);
    assert_eq!(recent[1], middle);
    assert_eq!(recent[2], oldest);

    // Quantity caps the result from the newest end
    let top_two = store.recent(2).unwrap();
    assert_eq!(top_two, vec![newest, middle]);
    assert!(store.recent(0).unwrap().is_empty());
}

#[test]
fn test_memory_needs_rotation() {
    let store = InMemoryStore::new();

    // Empty store always rotates
    assert!(store.needs_rotation(90).unwrap());

    store.save(&fresh_record()).unwrap();
    assert!(!store.needs_rotation(90).unwrap());

    store.save(&record_aged_days(2)).unwrap();
    assert!(store.needs_rotation(1).unwrap());
}

#[test]
fn test_memory_clear_discards_everything() {
    let store = InMemoryStore::new();
    store.save(&fresh_record()).unwrap();
    store.save(&fresh_record()).unwrap();

    store.clear().unwrap();

    assert!(matches!(store.current(), Err(KeyError::NotFound { .. })));
    assert!(store.recent(10).unwrap().is_empty());
    assert!(store.needs_rotation(90).unwrap());

    // The store keeps working after a clear
    let next = fresh_record();
    store.save(&next).unwrap();
    assert_eq!(store.current().unwrap(), next);
}

#[test]
fn test_filesystem_save_then_current() {
    let temp_dir = tempdir().unwrap();
    let store = FileSystemStore::new(temp_dir.path(), "");
    let record = fresh_record();

    store.save(&record).unwrap();

    assert_eq!(store.current().unwrap(), record);
    assert!(store.current_path().exists());
}

#[test]
fn test_filesystem_current_on_empty_store() {
    let temp_dir = tempdir().unwrap();
    let store = FileSystemStore::new(temp_dir.path(), "");

    assert!(matches!(store.current(), Err(KeyError::NotFound { .. })));
    assert!(store.recent(5).unwrap().is_empty());
}

#[test]
fn test_filesystem_survives_a_fresh_handle() {
    let temp_dir = tempdir().unwrap();
    let record = fresh_record();

    {
        let store = FileSystemStore::new(temp_dir.path(), "signing-");
        store.save(&record).unwrap();
    }

    // A new handle over the same directory sees the same state
    let reopened = FileSystemStore::new(temp_dir.path(), "signing-");
    assert_eq!(reopened.current().unwrap(), record);
    assert!(!reopened.needs_rotation(90).unwrap());
}

#[test]
fn test_filesystem_save_archives_previous_current() {
    let temp_dir = tempdir().unwrap();
    let store = FileSystemStore::new(temp_dir.path(), "auth-");
    let first = record_aged_days(1);
    let second = fresh_record();

    store.save(&first).unwrap();
    store.save(&second).unwrap();

    assert_eq!(store.current().unwrap(), second);
    assert_eq!(store.recent(5).unwrap(), vec![second, first]);

    // One current file plus one dated archive, all carrying the prefix
    let mut names: Vec<String> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names.len(), 2);
    assert!(names.iter().all(|name| name.starts_with("auth-")));
    assert!(names.contains(&"auth-current.key".to_string()));
    let archive_date = Utc::now().format("auth-old-%Y-%m-%d-").to_string();
    assert!(names.iter().any(|name| name.starts_with(&archive_date)));
}

#[test]
fn test_filesystem_rotation_reads_record_date_not_file_date() {
    let temp_dir = tempdir().unwrap();
    let store = FileSystemStore::new(temp_dir.path(), "");

    // The file is written now, but the record says the key is old
    store.save(&record_aged_days(2)).unwrap();

    assert!(store.needs_rotation(1).unwrap());
    assert!(!store.needs_rotation(90).unwrap());
}

#[test]
fn test_filesystem_recent_orders_by_creation_date() {
    let temp_dir = tempdir().unwrap();
    let store = FileSystemStore::new(temp_dir.path(), "");
    let oldest = record_aged_days(5);
    let middle = record_aged_days(2);
    let newest = fresh_record();

    store.save(&oldest).unwrap();
    store.save(&middle).unwrap();
    store.save(&newest).unwrap();

    let recent = store.recent(10).unwrap();
    assert_eq!(recent, vec![newest.clone(), middle, oldest]);
    assert_eq!(store.recent(1).unwrap(), vec![newest]);
}

#[test]
fn test_filesystem_ignores_foreign_files() {
    let temp_dir = tempdir().unwrap();
    let store = FileSystemStore::new(temp_dir.path(), "");
    let record = fresh_record();

    store.save(&record).unwrap();
    std::fs::write(temp_dir.path().join("README.txt"), "not a key").unwrap();

    assert_eq!(store.recent(10).unwrap(), vec![record]);

    store.clear().unwrap();

    // Only key files are removed
    assert!(temp_dir.path().join("README.txt").exists());
    assert!(!store.current_path().exists());
}

#[test]
fn test_filesystem_clear_then_save() {
    let temp_dir = tempdir().unwrap();
    let store = FileSystemStore::new(temp_dir.path(), "");
    store.save(&fresh_record()).unwrap();
    store.save(&fresh_record()).unwrap();

    store.clear().unwrap();

    assert!(matches!(store.current(), Err(KeyError::NotFound { .. })));
    assert!(store.recent(10).unwrap().is_empty());

    let next = fresh_record();
    store.save(&next).unwrap();
    assert_eq!(store.current().unwrap(), next);
    assert_eq!(store.recent(10).unwrap().len(), 1);
}

#[test]
fn test_filesystem_clear_spans_prefixes() {
    let temp_dir = tempdir().unwrap();
    let first = FileSystemStore::new(temp_dir.path(), "a-");
    let second = FileSystemStore::new(temp_dir.path(), "b-");
    first.save(&fresh_record()).unwrap();
    second.save(&fresh_record()).unwrap();

    // Clearing removes every key file in the directory, both prefixes
    first.clear().unwrap();

    assert!(matches!(first.current(), Err(KeyError::NotFound { .. })));
    assert!(matches!(second.current(), Err(KeyError::NotFound { .. })));
}

#[test]
fn test_filesystem_corrupt_record_is_an_error() {
    let temp_dir = tempdir().unwrap();
    let store = FileSystemStore::new(temp_dir.path(), "");
    store.save(&fresh_record()).unwrap();

    std::fs::write(temp_dir.path().join("old-broken.key"), "{ not json").unwrap();

    // No silent fallback: the scan surfaces the broken record
    assert!(store.recent(10).unwrap_err().error_type() == "SerializationError");
}
