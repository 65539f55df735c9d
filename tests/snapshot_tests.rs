//! Tests for snapshots
//!
//! These tests verify:
//! - MemStore point reads and ordered scans
//! - Snapshots are frozen against later writes
//! - Snapshot dump files round-trip and detect corruption
//! - Bucket enumeration through the meta codec

use std::fs;

use kvcatalog::codec::{encode_database_id, MetaCodec, KEY_DBS};
use kvcatalog::{CatalogError, CatalogReader, MemSnapshot, MemStore, Snapshot, SnapshotFile};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn sample_store() -> MemStore {
    let store = MemStore::new();
    store.put(b"a".to_vec(), "1");
    store.put(b"b".to_vec(), "2");
    store.put(b"ba".to_vec(), "3");
    store.put(b"c".to_vec(), "4");
    store
}

fn keys(pairs: &[(bytes::Bytes, bytes::Bytes)]) -> Vec<Vec<u8>> {
    pairs.iter().map(|(k, _)| k.to_vec()).collect()
}

// =============================================================================
// MemStore Tests
// =============================================================================

#[test]
fn test_new_store_is_empty() {
    let store = MemStore::new();
    assert!(store.is_empty());
    assert_eq!(store.snapshot().timestamp(), 0);
}

#[test]
fn test_put_advances_clock() {
    let store = MemStore::new();
    assert_eq!(store.put(b"k".to_vec(), "v"), 1);
    assert_eq!(store.put(b"k".to_vec(), "w"), 2);
    assert_eq!(store.delete(b"k"), 3);
    assert_eq!(store.snapshot().timestamp(), 3);
}

#[test]
fn test_snapshot_get() {
    let snapshot = sample_store().snapshot();

    assert_eq!(snapshot.get(b"b").unwrap().as_deref(), Some(&b"2"[..]));
    assert_eq!(snapshot.get(b"zz").unwrap(), None);
}

#[test]
fn test_scan_range_is_half_open() {
    let snapshot = sample_store().snapshot();

    let pairs = snapshot.scan(b"b", Some(&b"c"[..])).unwrap();
    assert_eq!(keys(&pairs), vec![b"b".to_vec(), b"ba".to_vec()]);
}

#[test]
fn test_scan_unbounded() {
    let snapshot = sample_store().snapshot();

    let pairs = snapshot.scan(b"b", None).unwrap();
    assert_eq!(keys(&pairs), vec![b"b".to_vec(), b"ba".to_vec(), b"c".to_vec()]);
}

#[test]
fn test_scan_empty_range() {
    let snapshot = sample_store().snapshot();

    assert!(snapshot.scan(b"c", Some(&b"a"[..])).unwrap().is_empty());
    assert!(snapshot.scan(b"b", Some(&b"b"[..])).unwrap().is_empty());
}

#[test]
fn test_snapshot_frozen_against_writes() {
    let store = sample_store();
    let snapshot = store.snapshot();

    store.put(b"a".to_vec(), "changed");
    store.delete(b"c");
    store.put(b"d".to_vec(), "new");

    assert_eq!(snapshot.get(b"a").unwrap().as_deref(), Some(&b"1"[..]));
    assert!(snapshot.get(b"c").unwrap().is_some());
    assert!(snapshot.get(b"d").unwrap().is_none());
    assert_eq!(snapshot.len(), 4);

    let latest = store.snapshot();
    assert_eq!(latest.get(b"a").unwrap().as_deref(), Some(&b"changed"[..]));
    assert!(latest.get(b"c").unwrap().is_none());
}

#[test]
fn test_from_pairs() {
    let snapshot = MemSnapshot::from_pairs(
        17,
        vec![(b"y".to_vec(), b"2".to_vec()), (b"x".to_vec(), b"1".to_vec())],
    );

    assert_eq!(snapshot.timestamp(), 17);
    let order: Vec<&[u8]> = snapshot.iter().map(|(k, _)| k).collect();
    assert_eq!(order, vec![&b"x"[..], &b"y"[..]]);
}

// =============================================================================
// Bucket Enumeration Tests
// =============================================================================

#[test]
fn test_hash_get_fields_stays_inside_bucket() {
    let codec = MetaCodec::default();
    let store = MemStore::new();
    store.put(codec.encode_hash_data_key(KEY_DBS, b"DB:1"), "a");
    store.put(codec.encode_hash_data_key(KEY_DBS, b"DB:2"), "b");
    store.put(codec.encode_hash_data_key(b"DBsX", b"DB:3"), "c");
    store.put(codec.encode_hash_data_key(b"DB:1", b"Table:1"), "d");
    store.put(codec.encode_string_key(KEY_DBS), "e");

    let snapshot = store.snapshot();
    let fields = codec.hash_get_fields(&snapshot, KEY_DBS).unwrap();

    let names: Vec<Vec<u8>> = fields.iter().map(|(f, _)| f.to_vec()).collect();
    assert_eq!(names, vec![b"DB:1".to_vec(), b"DB:2".to_vec()]);
}

#[test]
fn test_hash_get_and_bytes_get() {
    let codec = MetaCodec::default();
    let store = MemStore::new();
    store.put(codec.encode_hash_data_key(KEY_DBS, &encode_database_id(3)), "db3");
    store.put(codec.encode_string_key(b"SchemaVersionKey"), "5");

    let snapshot = store.snapshot();

    let value = codec.hash_get(&snapshot, KEY_DBS, b"DB:3").unwrap();
    assert_eq!(value.as_deref(), Some(&b"db3"[..]));
    assert_eq!(codec.hash_get(&snapshot, KEY_DBS, b"DB:4").unwrap(), None);

    let version = codec.bytes_get(&snapshot, b"SchemaVersionKey").unwrap();
    assert_eq!(version.as_deref(), Some(&b"5"[..]));
}

// =============================================================================
// Snapshot File Tests
// =============================================================================

#[test]
fn test_snapshot_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("catalog.kvcs");

    let store = sample_store();
    let snapshot = store.snapshot();

    let written = SnapshotFile::write(&path, &snapshot).unwrap();
    assert_eq!(written, 4);

    let loaded = SnapshotFile::load(&path).unwrap();
    assert_eq!(loaded.timestamp(), snapshot.timestamp());
    assert_eq!(
        loaded.scan(b"", None).unwrap(),
        snapshot.scan(b"", None).unwrap()
    );
}

#[test]
fn test_snapshot_file_serves_catalog() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("catalog.kvcs");

    let codec = MetaCodec::default();
    let store = MemStore::new();
    store.put(codec.encode_string_key(b"SchemaVersionKey"), "31");
    store.put(
        codec.encode_hash_data_key(KEY_DBS, &encode_database_id(1)),
        r#"{"name":"test"}"#,
    );
    SnapshotFile::write(&path, &store.snapshot()).unwrap();

    let loaded = SnapshotFile::load(&path).unwrap();
    let reader = CatalogReader::new(&loaded);

    assert_eq!(reader.get_schema_version().unwrap(), 31);
    assert_eq!(reader.get_database(1).unwrap().unwrap().name, "test");
}

#[test]
fn test_snapshot_file_empty() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.kvcs");

    SnapshotFile::write(&path, &MemStore::new().snapshot()).unwrap();
    let loaded = SnapshotFile::load(&path).unwrap();

    assert!(loaded.is_empty());
}

#[test]
fn test_snapshot_file_detects_flipped_byte() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("catalog.kvcs");
    SnapshotFile::write(&path, &sample_store().snapshot()).unwrap();

    let mut bytes = fs::read(&path).unwrap();
    // First byte of the body
    bytes[22] ^= 0xFF;
    fs::write(&path, &bytes).unwrap();

    let result = SnapshotFile::load(&path);
    assert!(matches!(result, Err(CatalogError::Corruption(_))));
}

#[test]
fn test_snapshot_file_detects_truncation() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("catalog.kvcs");
    SnapshotFile::write(&path, &sample_store().snapshot()).unwrap();

    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

    let result = SnapshotFile::load(&path);
    assert!(matches!(result, Err(CatalogError::Corruption(_))));
}

#[test]
fn test_snapshot_file_bad_magic() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("not-a-dump");
    fs::write(&path, vec![0u8; 64]).unwrap();

    let result = SnapshotFile::load(&path);
    assert!(matches!(result, Err(CatalogError::Corruption(_))));
}

#[test]
fn test_snapshot_file_missing() {
    let temp_dir = TempDir::new().unwrap();
    let result = SnapshotFile::load(&temp_dir.path().join("absent"));
    assert!(matches!(result, Err(CatalogError::Io(_))));
}
