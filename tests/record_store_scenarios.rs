//! Record Store Behavior Tests
//!
//! End-to-end scenarios against the in-memory reference backend:
//! - Create never overwrites a current value
//! - Update merges non-empty attributes only
//! - Delete leaves a tombstone in history
//! - Query results are case-insensitive and ordered by the backend
//! - Every write adds exactly one history entry

use recordledger::backend::{MemoryStore, TxIdMode};
use recordledger::keys::{KeyDeriver, RecordKey};
use recordledger::ledger::{RecordError, RecordStore};
use recordledger::record::{Attribute, Record, RecordPatch};

// =============================================================================
// Test Utilities
// =============================================================================

fn new_store() -> RecordStore<MemoryStore> {
    RecordStore::new(MemoryStore::with_tx_mode(TxIdMode::Sequential))
}

fn key(k: &str) -> RecordKey {
    RecordKey::from(k)
}

// =============================================================================
// Full Lifecycle
// =============================================================================

/// create(id1) -> update(phone) -> delete -> history has three entries,
/// the last one a deletion with no value.
#[test]
fn test_lifecycle_history_has_three_entries() {
    let mut store = new_store();

    store
        .create(Some(key("id1")), &Record::new("A", "555", "X"))
        .unwrap();
    store
        .update(&key("id1"), &RecordPatch::new("", "556", ""))
        .unwrap();
    store.delete(&key("id1")).unwrap();

    let history = store.history(&key("id1")).unwrap();
    assert_eq!(history.len(), 3);

    assert_eq!(history[0].value, Some(Record::new("A", "555", "X")));
    assert!(!history[0].is_delete);

    assert_eq!(history[1].value, Some(Record::new("A", "556", "X")));
    assert!(!history[1].is_delete);

    assert_eq!(history[2].value, None);
    assert!(history[2].is_delete);

    let tx_ids: Vec<&str> = history.iter().map(|h| h.tx_id.as_str()).collect();
    assert_eq!(tx_ids, vec!["tx00000001", "tx00000002", "tx00000003"]);

    assert_eq!(store.get(&key("id1")).unwrap(), None);
}

/// Timestamps in a key's history never go backwards.
#[test]
fn test_history_timestamps_are_ordered() {
    let mut store = new_store();
    store.create(Some(key("k")), &Record::new("A", "", "")).unwrap();
    for phone in ["1", "2", "3"] {
        store.update(&key("k"), &RecordPatch::new("", phone, "")).unwrap();
    }

    let history = store.history(&key("k")).unwrap();
    assert_eq!(history.len(), 4);
    for pair in history.windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }
}

// =============================================================================
// Content Addressing
// =============================================================================

/// The same (name, phone, id) twice is a duplicate, and the second attempt
/// writes nothing.
#[test]
fn test_derived_key_duplicate_rejected() {
    let mut store = new_store();
    let record = Record::new("Alice", "010-1234", "alice01");

    let first = store.create(None, &record).unwrap();
    assert_eq!(first, KeyDeriver::for_record(&record));

    let err = store.create(None, &record).unwrap_err();
    assert_eq!(err, RecordError::AlreadyExists(first.clone()));

    assert_eq!(store.history(&first).unwrap().len(), 1);
    assert_eq!(store.backend().entry_count(), 1);
}

/// Changing any one attribute yields a different key.
#[test]
fn test_derived_keys_differ_per_attribute() {
    let mut store = new_store();
    let a = store.create(None, &Record::new("A", "555", "X")).unwrap();
    let b = store.create(None, &Record::new("A", "555", "Y")).unwrap();
    let c = store.create(None, &Record::new("B", "555", "X")).unwrap();

    assert_ne!(a, b);
    assert_ne!(a, c);
    assert_ne!(b, c);
    assert_eq!(store.list_all().unwrap().len(), 3);
}

/// A deleted key can be created again; its history keeps growing.
#[test]
fn test_recreate_after_delete_extends_history() {
    let mut store = new_store();
    store.create(Some(key("id1")), &Record::new("A", "", "")).unwrap();
    store.delete(&key("id1")).unwrap();
    store.create(Some(key("id1")), &Record::new("B", "", "")).unwrap();

    assert_eq!(store.get(&key("id1")).unwrap(), Some(Record::new("B", "", "")));
    assert_eq!(store.history(&key("id1")).unwrap().len(), 3);
}

// =============================================================================
// Preconditions
// =============================================================================

#[test]
fn test_update_and_delete_missing_key_write_nothing() {
    let mut store = new_store();

    let err = store
        .update(&key("ghost"), &RecordPatch::new("A", "", ""))
        .unwrap_err();
    assert_eq!(err, RecordError::NotFound(key("ghost")));

    let err = store.delete(&key("ghost")).unwrap_err();
    assert_eq!(err, RecordError::NotFound(key("ghost")));

    assert_eq!(store.backend().entry_count(), 0);
    assert!(store.history(&key("ghost")).unwrap().is_empty());
}

/// An all-empty patch still rewrites the record unchanged.
#[test]
fn test_empty_patch_appends_identical_version() {
    let mut store = new_store();
    store.create(Some(key("k")), &Record::new("A", "555", "X")).unwrap();

    let written = store.update(&key("k"), &RecordPatch::default()).unwrap();
    assert_eq!(written, Record::new("A", "555", "X"));

    let history = store.history(&key("k")).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].value, history[1].value);
}

// =============================================================================
// Queries
// =============================================================================

#[test]
fn test_attribute_queries_ignore_case() {
    let mut store = new_store();
    store.create(Some(key("k1")), &Record::new("Alice", "555", "A1")).unwrap();
    store.create(Some(key("k2")), &Record::new("alice", "556", "A2")).unwrap();
    store.create(Some(key("k3")), &Record::new("Bob", "555", "B1")).unwrap();

    let by_name = store.query_by_attribute(Attribute::Name, "ALICE").unwrap();
    let keys: Vec<&str> = by_name.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["k1", "k2"]);

    let by_phone = store.query_by_attribute(Attribute::Phone, "555").unwrap();
    assert_eq!(by_phone.len(), 2);
    assert!(by_phone
        .iter()
        .all(|row| Attribute::Phone.value_of(&row.record) == "555"));

    let by_id = store.query_by_attribute(Attribute::Id, "b1").unwrap();
    assert_eq!(by_id.len(), 1);
    assert_eq!(by_id[0].record.name, "Bob");
}

#[test]
fn test_deleted_records_leave_queries() {
    let mut store = new_store();
    store.create(Some(key("k1")), &Record::new("A", "555", "")).unwrap();
    store.create(Some(key("k2")), &Record::new("B", "555", "")).unwrap();
    store.delete(&key("k1")).unwrap();

    let rows = store.query_by_attribute(Attribute::Phone, "555").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].key, key("k2"));

    let all = store.list_all().unwrap();
    assert_eq!(all.len(), 1);

    let backend = store.into_backend();
    assert_eq!(backend.live_count(), 1);
    assert_eq!(backend.entry_count(), 3);
}

#[test]
fn test_selector_query_with_two_fields() {
    let mut store = new_store();
    store.create(Some(key("k1")), &Record::new("A", "555", "X")).unwrap();
    store.create(Some(key("k2")), &Record::new("A", "556", "Y")).unwrap();

    let rows = store
        .query_by_selector(r#"{"selector":{"name":"a","phone":"556"}}"#)
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].key, key("k2"));
}

#[test]
fn test_malformed_selector_is_syntax_error() {
    let store = new_store();
    for selector in ["", "{", r#"{"name":"a"}"#, r#"{"selector":[1]}"#] {
        let err = store.query_by_selector(selector).unwrap_err();
        assert_eq!(err.code(), "REC_QUERY_SYNTAX", "selector {:?}", selector);
    }
}

#[test]
fn test_empty_store_lists_nothing() {
    let store = new_store();
    assert!(store.list_all().unwrap().is_empty());
    assert!(store.query_by_attribute(Attribute::Name, "a").unwrap().is_empty());
    assert!(store.history(&key("none")).unwrap().is_empty());
}
