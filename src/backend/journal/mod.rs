//! Journal-backed versioned store
//!
//! `JournalStore` keeps the full version log of a `MemoryStore` in
//! `<data_dir>/journal/records.jnl`. Each write is made durable (frame
//! appended and fsynced) before it becomes visible in memory. A failed
//! append is truncated away, so it leaves neither the store nor the file
//! changed. On open the journal is replayed in
//! file order, which reproduces both current values and every key's history.

mod frame;
mod reader;
mod writer;

use std::fs;
use std::path::{Path, PathBuf};

pub use frame::JournalFrame;
pub use reader::JournalReader;
pub use writer::JournalWriter;

use super::cursor::{HistoryCursor, KvCursor};
use super::errors::{BackendError, BackendResult};
use super::memory::{MemoryStore, TxIdMode};
use super::version::VersionPayload;
use super::{QueryBackend, VersionedStore};

/// Journal directory under the data directory.
pub const JOURNAL_DIR: &str = "journal";

/// Journal file name.
pub const JOURNAL_FILE: &str = "records.jnl";

/// A `MemoryStore` persisted to an append-only journal.
pub struct JournalStore {
    memory: MemoryStore,
    writer: JournalWriter,
    replayed: u64,
}

impl JournalStore {
    /// Returns the journal path for a data directory.
    pub fn journal_path(data_dir: &Path) -> PathBuf {
        data_dir.join(JOURNAL_DIR).join(JOURNAL_FILE)
    }

    /// Opens the journal under `data_dir`, replaying any existing entries.
    pub fn open(data_dir: &Path, tx_mode: TxIdMode) -> BackendResult<Self> {
        let dir = data_dir.join(JOURNAL_DIR);
        fs::create_dir_all(&dir).map_err(|e| {
            BackendError::unavailable(format!(
                "failed to create journal directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let path = Self::journal_path(data_dir);
        let mut memory = MemoryStore::with_tx_mode(tx_mode);
        let mut replayed = 0;

        if path.exists() {
            for entry in JournalReader::open(&path)?.read_all()? {
                memory.apply(entry);
                replayed += 1;
            }
        }

        let writer = JournalWriter::open(&path)?;

        Ok(Self {
            memory,
            writer,
            replayed,
        })
    }

    /// Number of entries replayed on open.
    pub fn replayed(&self) -> u64 {
        self.replayed
    }

    /// Path of the journal file.
    pub fn path(&self) -> &Path {
        self.writer.path()
    }

    /// Read access to the in-memory state.
    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    fn append(&mut self, key: &str, payload: VersionPayload) -> BackendResult<()> {
        let entry = self.memory.next_entry(key, payload);
        self.writer.append(&entry)?;
        self.memory.apply(entry);
        Ok(())
    }
}

impl VersionedStore for JournalStore {
    fn get(&self, key: &str) -> BackendResult<Option<Vec<u8>>> {
        self.memory.get(key)
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> BackendResult<()> {
        self.append(key, VersionPayload::Value(value))
    }

    fn delete(&mut self, key: &str) -> BackendResult<()> {
        self.append(key, VersionPayload::Tombstone)
    }

    fn scan_range(&self, start: &str, end: &str) -> BackendResult<KvCursor> {
        self.memory.scan_range(start, end)
    }

    fn history_of(&self, key: &str) -> BackendResult<HistoryCursor> {
        self.memory.history_of(key)
    }
}

impl QueryBackend for JournalStore {
    fn query(&self, selector: &str) -> BackendResult<KvCursor> {
        self.memory.query(selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::VersionEntry;
    use tempfile::TempDir;
    use super::writer::WriteFault;

    fn history(store: &JournalStore, key: &str) -> Vec<VersionEntry> {
        store.history_of(key).unwrap().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn test_open_creates_journal() {
        let dir = TempDir::new().unwrap();
        let store = JournalStore::open(dir.path(), TxIdMode::Sequential).unwrap();
        assert!(store.path().exists());
        assert_eq!(store.replayed(), 0);
    }

    #[test]
    fn test_reopen_replays_history() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = JournalStore::open(dir.path(), TxIdMode::Sequential).unwrap();
            store.put("k", b"v1".to_vec()).unwrap();
            store.put("k", b"v2".to_vec()).unwrap();
            store.put("j", b"x".to_vec()).unwrap();
            store.delete("j").unwrap();
        }

        let store = JournalStore::open(dir.path(), TxIdMode::Sequential).unwrap();
        assert_eq!(store.replayed(), 4);
        assert_eq!(store.get("k").unwrap(), Some(b"v2".to_vec()));
        assert_eq!(store.get("j").unwrap(), None);

        let k = history(&store, "k");
        assert_eq!(k.len(), 2);
        assert_eq!(k[0].tx_id(), "tx00000001");
        assert!(history(&store, "j")[1].is_delete());
    }

    #[test]
    fn test_sequential_ids_continue_after_replay() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = JournalStore::open(dir.path(), TxIdMode::Sequential).unwrap();
            store.put("k", b"a".to_vec()).unwrap();
        }
        let mut store = JournalStore::open(dir.path(), TxIdMode::Sequential).unwrap();
        store.put("k", b"b".to_vec()).unwrap();
        assert_eq!(history(&store, "k")[1].tx_id(), "tx00000002");
    }

    #[test]
    fn test_corrupt_journal_refused() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = JournalStore::open(dir.path(), TxIdMode::Sequential).unwrap();
            store.put("k", b"some value".to_vec()).unwrap();
        }

        let path = JournalStore::journal_path(dir.path());
        let mut bytes = fs::read(&path).unwrap();
        let last = bytes.len() - 6;
        bytes[last] ^= 0x5A;
        fs::write(&path, bytes).unwrap();

        let err = JournalStore::open(dir.path(), TxIdMode::Sequential).err().unwrap();
        assert!(matches!(err, BackendError::Unavailable(_)));
        assert!(err.message().contains("corruption"));
    }

    #[test]
    fn test_truncated_tail_refused() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = JournalStore::open(dir.path(), TxIdMode::Sequential).unwrap();
            store.put("k", b"some value".to_vec()).unwrap();
        }

        let path = JournalStore::journal_path(dir.path());
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() - 2]).unwrap();

        assert!(JournalStore::open(dir.path(), TxIdMode::Sequential).is_err());
    }

    #[test]
    fn test_failed_append_not_replayed() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = JournalStore::open(dir.path(), TxIdMode::Sequential).unwrap();
            store.put("a", b"1".to_vec()).unwrap();

            store.writer.inject_fault(WriteFault {
                written: 3,
                rollback_fails: false,
            });
            assert!(store.put("b", b"2".to_vec()).is_err());
            assert_eq!(store.get("b").unwrap(), None);

            store.put("c", b"3".to_vec()).unwrap();
        }

        let store = JournalStore::open(dir.path(), TxIdMode::Sequential).unwrap();
        assert_eq!(store.replayed(), 2);
        assert_eq!(store.get("a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.get("b").unwrap(), None);
        assert_eq!(store.get("c").unwrap(), Some(b"3".to_vec()));
        assert_eq!(history(&store, "c")[0].tx_id(), "tx00000002");
    }

    #[test]
    fn test_poisoned_journal_refuses_writes() {
        let dir = TempDir::new().unwrap();
        let mut store = JournalStore::open(dir.path(), TxIdMode::Sequential).unwrap();
        store.writer.inject_fault(WriteFault {
            written: 3,
            rollback_fails: true,
        });

        assert!(store.put("a", b"1".to_vec()).is_err());
        assert!(store.put("b", b"2".to_vec()).is_err());
        assert!(store.delete("a").is_err());
        assert_eq!(store.memory().entry_count(), 0);
    }
}
