//! Cursor-to-list conversion
//!
//! Drains a backend cursor exactly once, in arrival order, decoding each
//! stored value into a nested record. Zero rows produce an empty list. The
//! cursor is wrapped in a `CursorGuard`, so it is closed on every exit path,
//! including a decode or backend error part way through.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::errors::{RecordError, RecordResult};
use crate::backend::{CursorGuard, HistoryCursor, KvCursor};
use crate::keys::RecordKey;
use crate::record::Record;

/// One `{key, record}` element of a result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyedRecord {
    pub key: RecordKey,
    pub record: Record,
}

/// One element of a key's history.
///
/// `value` is None for deletions, never an empty record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub tx_id: String,
    pub value: Option<Record>,
    pub timestamp: DateTime<Utc>,
    pub is_delete: bool,
}

/// Streaming conversion of cursors into result lists.
pub struct ResultSerializer;

impl ResultSerializer {
    /// Drains a key/value cursor into `{key, record}` pairs.
    pub fn serialize(cursor: KvCursor) -> RecordResult<Vec<KeyedRecord>> {
        let mut results = Vec::new();
        for row in CursorGuard::new(cursor) {
            let pair = row?;
            let record = Record::from_bytes(&pair.value)
                .map_err(|e| RecordError::corrupt(pair.key.as_str(), e))?;
            results.push(KeyedRecord {
                key: RecordKey::new(pair.key),
                record,
            });
        }
        Ok(results)
    }

    /// Drains a history cursor, oldest entry first.
    pub fn serialize_history(
        key: &RecordKey,
        cursor: HistoryCursor,
    ) -> RecordResult<Vec<HistoryEntry>> {
        let mut results = Vec::new();
        for row in CursorGuard::new(cursor) {
            let entry = row?;
            let value = entry
                .value()
                .map(Record::from_bytes)
                .transpose()
                .map_err(|e| RecordError::corrupt(key.clone(), e))?;
            results.push(HistoryEntry {
                tx_id: entry.tx_id().to_string(),
                value,
                timestamp: entry.timestamp(),
                is_delete: entry.is_delete(),
            });
        }
        Ok(results)
    }
}
