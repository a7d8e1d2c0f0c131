//! Rows produced by backends
//!
//! - `KvPair` - one current key/value pair from a scan or query
//! - `VersionEntry` - one immutable write (or delete) in a key's history
//!
//! A deletion is an explicit tombstone payload, not an empty value.

use chrono::{DateTime, Utc};

/// A current key/value pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KvPair {
    pub key: String,
    pub value: Vec<u8>,
}

impl KvPair {
    pub fn new(key: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// The payload of a version entry: stored bytes or a tombstone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VersionPayload {
    /// Value written by a put.
    Value(Vec<u8>),
    /// Deletion marker.
    Tombstone,
}

impl VersionPayload {
    /// Returns true if this payload is a tombstone.
    #[inline]
    pub fn is_tombstone(&self) -> bool {
        matches!(self, VersionPayload::Tombstone)
    }
}

/// One immutable entry of a key's history.
///
/// All fields are private; an entry never changes after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionEntry {
    key: String,
    payload: VersionPayload,
    tx_id: String,
    timestamp: DateTime<Utc>,
}

impl VersionEntry {
    pub fn new(
        key: impl Into<String>,
        payload: VersionPayload,
        tx_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            key: key.into(),
            payload,
            tx_id: tx_id.into(),
            timestamp,
        }
    }

    /// Creates an entry for a put.
    pub fn with_value(
        key: impl Into<String>,
        value: Vec<u8>,
        tx_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(key, VersionPayload::Value(value), tx_id, timestamp)
    }

    /// Creates a tombstone entry.
    pub fn with_tombstone(
        key: impl Into<String>,
        tx_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(key, VersionPayload::Tombstone, tx_id, timestamp)
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn payload(&self) -> &VersionPayload {
        &self.payload
    }

    #[inline]
    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[inline]
    pub fn is_delete(&self) -> bool {
        self.payload.is_tombstone()
    }

    /// Returns the written bytes, or None for a tombstone.
    pub fn value(&self) -> Option<&[u8]> {
        match &self.payload {
            VersionPayload::Value(bytes) => Some(bytes),
            VersionPayload::Tombstone => None,
        }
    }
}
