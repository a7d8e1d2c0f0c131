//! Backend contracts and reference implementations
//!
//! The record store does not own a storage engine. It consumes two
//! collaborators through the narrow traits defined here:
//!
//! - `VersionedStore` - current value per key plus an append-only per-key
//!   history, point and range lookups
//! - `QueryBackend` - evaluates a selector string over current values
//!
//! # Contract
//!
//! - Every put and every delete appends exactly one `VersionEntry` to the
//!   key's history, in write order
//! - The current value of a key is its latest entry unless that entry is a
//!   tombstone
//! - History is never rewritten or compacted
//! - Conflicting concurrent writes to one key must be rejected or
//!   serialized by the backend; the record store's check-then-write
//!   sequences are not atomic on their own
//! - Selector parsing is entirely the query backend's job. Raw selectors
//!   reach it unvalidated
//!
//! # Reference backends
//!
//! - `MemoryStore` - in-process map of version chains
//! - `JournalStore` - `MemoryStore` persisted to a checksummed append-only
//!   journal and replayed on open

mod cursor;
mod errors;
mod journal;
mod memory;
mod selector;
mod version;

pub use cursor::{Cursor, CursorGuard, HistoryCursor, KvCursor, VecCursor};
pub use errors::{BackendError, BackendResult};
pub use journal::{
    JournalFrame, JournalReader, JournalStore, JournalWriter, JOURNAL_DIR, JOURNAL_FILE,
};
pub use memory::{MemoryStore, TxIdMode};
pub use selector::SelectorFilter;
pub use version::{KvPair, VersionEntry, VersionPayload};

/// A key-value store that keeps every prior version of each key.
pub trait VersionedStore {
    /// Returns the current value for `key`, or None if absent or deleted.
    fn get(&self, key: &str) -> BackendResult<Option<Vec<u8>>>;

    /// Writes `value` as the new current value for `key`.
    fn put(&mut self, key: &str, value: Vec<u8>) -> BackendResult<()>;

    /// Appends a tombstone for `key`.
    fn delete(&mut self, key: &str) -> BackendResult<()>;

    /// Scans current pairs with `start <= key < end`.
    ///
    /// An empty `start` or `end` leaves that side unbounded.
    fn scan_range(&self, start: &str, end: &str) -> BackendResult<KvCursor>;

    /// Returns every entry written for `key`, oldest first.
    fn history_of(&self, key: &str) -> BackendResult<HistoryCursor>;
}

/// Evaluates selectors over current values.
pub trait QueryBackend {
    /// Runs `selector` and returns matching current pairs.
    ///
    /// Malformed selectors are reported as `BackendError::QuerySyntax`.
    fn query(&self, selector: &str) -> BackendResult<KvCursor>;
}

/// A backend serving both roles, as a ledger peer does.
pub trait LedgerBackend: VersionedStore + QueryBackend {}

impl<T: VersionedStore + QueryBackend> LedgerBackend for T {}
