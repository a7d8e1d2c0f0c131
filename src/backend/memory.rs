//! In-memory versioned store
//!
//! Keeps one version chain per key in a `BTreeMap`, so range scans yield
//! keys in ascending byte order. Serves as both `VersionedStore` and
//! `QueryBackend`.
//!
//! Writes are split in two steps, `next_entry` then `apply`, so a
//! persistent wrapper can make an entry durable before it becomes visible.

use std::collections::BTreeMap;

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use super::cursor::{HistoryCursor, KvCursor, VecCursor};
use super::errors::BackendResult;
use super::selector::SelectorFilter;
use super::version::{KvPair, VersionEntry, VersionPayload};
use super::{QueryBackend, VersionedStore};

/// How transaction ids are assigned to new entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxIdMode {
    /// Random UUID v4 (simple form)
    #[default]
    Uuid,
    /// `tx00000001`, `tx00000002`, ... in store-wide write order
    Sequential,
}

/// In-memory map of version chains.
#[derive(Debug, Default)]
pub struct MemoryStore {
    chains: BTreeMap<String, Vec<VersionEntry>>,
    tx_mode: TxIdMode,
    entry_count: u64,
}

impl MemoryStore {
    /// Creates an empty store with UUID transaction ids.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with the given transaction id mode.
    pub fn with_tx_mode(tx_mode: TxIdMode) -> Self {
        Self {
            tx_mode,
            ..Self::default()
        }
    }

    /// Total number of entries across all keys.
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Number of keys with a current value.
    pub fn live_count(&self) -> usize {
        self.chains
            .values()
            .filter(|chain| Self::current(chain).is_some())
            .count()
    }

    /// Builds the entry the next write to `key` would append.
    pub fn next_entry(&self, key: &str, payload: VersionPayload) -> VersionEntry {
        VersionEntry::new(key, payload, self.next_tx_id(), Utc::now())
    }

    /// Appends an entry to its key's chain.
    ///
    /// Used for new writes and for journal replay.
    pub fn apply(&mut self, entry: VersionEntry) {
        self.entry_count += 1;
        self.chains
            .entry(entry.key().to_string())
            .or_default()
            .push(entry);
    }

    fn next_tx_id(&self) -> String {
        match self.tx_mode {
            TxIdMode::Uuid => Uuid::new_v4().simple().to_string(),
            TxIdMode::Sequential => format!("tx{:08}", self.entry_count + 1),
        }
    }

    fn current(chain: &[VersionEntry]) -> Option<&[u8]> {
        chain.last().and_then(|entry| entry.value())
    }

    fn current_pairs(&self) -> impl Iterator<Item = (&String, &[u8])> {
        self.chains
            .iter()
            .filter_map(|(key, chain)| Self::current(chain).map(|value| (key, value)))
    }
}

impl VersionedStore for MemoryStore {
    fn get(&self, key: &str) -> BackendResult<Option<Vec<u8>>> {
        Ok(self
            .chains
            .get(key)
            .and_then(|chain| Self::current(chain))
            .map(|value| value.to_vec()))
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> BackendResult<()> {
        let entry = self.next_entry(key, VersionPayload::Value(value));
        self.apply(entry);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> BackendResult<()> {
        let entry = self.next_entry(key, VersionPayload::Tombstone);
        self.apply(entry);
        Ok(())
    }

    fn scan_range(&self, start: &str, end: &str) -> BackendResult<KvCursor> {
        let rows: Vec<KvPair> = self
            .current_pairs()
            .filter(|(key, _)| start.is_empty() || key.as_str() >= start)
            .filter(|(key, _)| end.is_empty() || key.as_str() < end)
            .map(|(key, value)| KvPair::new(key.clone(), value.to_vec()))
            .collect();
        Ok(Box::new(VecCursor::new(rows)))
    }

    fn history_of(&self, key: &str) -> BackendResult<HistoryCursor> {
        let rows = self.chains.get(key).cloned().unwrap_or_default();
        Ok(Box::new(VecCursor::new(rows)))
    }
}

impl QueryBackend for MemoryStore {
    fn query(&self, selector: &str) -> BackendResult<KvCursor> {
        let filter = SelectorFilter::parse(selector)?;

        // Values that are not JSON documents are invisible to selectors.
        let rows: Vec<KvPair> = self
            .current_pairs()
            .filter(|(_, value)| {
                serde_json::from_slice::<Value>(value)
                    .map(|doc| filter.matches(&doc))
                    .unwrap_or(false)
            })
            .map(|(key, value)| KvPair::new(key.clone(), value.to_vec()))
            .collect();
        Ok(Box::new(VecCursor::new(rows)))
    }
}
