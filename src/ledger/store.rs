//! RecordStore - create, read, update, delete, query and history
//!
//! Write flow (create / update / delete):
//! 1. Resolve the key (create may derive it)
//! 2. Read the current value
//! 3. Check the precondition (absent for create, present and decodable
//!    for update and delete)
//! 4. Issue exactly one write
//!
//! Steps 2-4 are a check-then-act sequence. Atomicity against concurrent
//! writers to the same key comes from the backend, not from this type.
//! A failed precondition performs no write.

use super::errors::{RecordError, RecordResult};
use super::selector::{equality_selector, raw_selector};
use super::serializer::{HistoryEntry, KeyedRecord, ResultSerializer};
use crate::backend::LedgerBackend;
use crate::keys::{KeyDeriver, RecordKey};
use crate::observability::{log_event_with_fields, Event};
use crate::record::{Attribute, Record, RecordPatch};

/// The record store over a versioned backend.
pub struct RecordStore<B> {
    backend: B,
}

impl<B: LedgerBackend> RecordStore<B> {
    /// Create a store over `backend`.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Read access to the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Write access to the backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Consumes the store and returns the backend.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Creates a record under `key`, or under its content-derived key.
    ///
    /// Returns the key the record was written to.
    pub fn create(&mut self, key: Option<RecordKey>, record: &Record) -> RecordResult<RecordKey> {
        let key = key.unwrap_or_else(|| KeyDeriver::for_record(record));

        if self.backend.get(key.as_str())?.is_some() {
            log_event_with_fields(Event::RecordDuplicate, &[("key", key.as_str())]);
            return Err(RecordError::AlreadyExists(key));
        }

        let bytes = record
            .to_bytes()
            .map_err(|e| RecordError::InvalidArgument(format!("unencodable record: {}", e)))?;
        self.backend.put(key.as_str(), bytes)?;

        log_event_with_fields(Event::RecordCreated, &[("key", key.as_str())]);
        Ok(key)
    }

    /// Looks up the current record for `key`.
    ///
    /// An unknown or deleted key is `Ok(None)`, not an error.
    pub fn get(&self, key: &RecordKey) -> RecordResult<Option<Record>> {
        match self.backend.get(key.as_str())? {
            Some(bytes) => Record::from_bytes(&bytes)
                .map(Some)
                .map_err(|e| RecordError::corrupt(key.clone(), e)),
            None => Ok(None),
        }
    }

    /// Merges the non-empty attributes of `patch` into the current record.
    ///
    /// Returns the record as written.
    pub fn update(&mut self, key: &RecordKey, patch: &RecordPatch) -> RecordResult<Record> {
        let mut record = self
            .get(key)?
            .ok_or_else(|| RecordError::NotFound(key.clone()))?;

        patch.apply(&mut record);

        let bytes = record
            .to_bytes()
            .map_err(|e| RecordError::InvalidArgument(format!("unencodable record: {}", e)))?;
        self.backend.put(key.as_str(), bytes)?;

        log_event_with_fields(Event::RecordUpdated, &[("key", key.as_str())]);
        Ok(record)
    }

    /// Deletes the record under `key`.
    ///
    /// Stored bytes that do not decode block the delete.
    pub fn delete(&mut self, key: &RecordKey) -> RecordResult<()> {
        let bytes = self
            .backend
            .get(key.as_str())?
            .ok_or_else(|| RecordError::NotFound(key.clone()))?;

        if let Err(e) = Record::from_bytes(&bytes) {
            log_event_with_fields(Event::RecordCorrupt, &[("key", key.as_str())]);
            return Err(RecordError::corrupt(key.clone(), e));
        }

        self.backend.delete(key.as_str())?;

        log_event_with_fields(Event::RecordDeleted, &[("key", key.as_str())]);
        Ok(())
    }

    /// Returns every current record in backend order.
    pub fn list_all(&self) -> RecordResult<Vec<KeyedRecord>> {
        let cursor = self.backend.scan_range("", "")?;
        let results = ResultSerializer::serialize(cursor)?;
        Self::log_query("range", results.len());
        Ok(results)
    }

    /// Returns records whose `attribute` equals `value`, ignoring case.
    pub fn query_by_attribute(
        &self,
        attribute: Attribute,
        value: &str,
    ) -> RecordResult<Vec<KeyedRecord>> {
        let selector = equality_selector(attribute, value);
        let results = ResultSerializer::serialize(self.backend.query(&selector)?)?;
        Self::log_query(attribute.field_name(), results.len());
        Ok(results)
    }

    /// Runs a caller-supplied selector.
    ///
    /// The selector is lower-cased and otherwise forwarded untouched; the
    /// query backend is responsible for parsing it safely.
    pub fn query_by_selector(&self, selector: &str) -> RecordResult<Vec<KeyedRecord>> {
        let selector = raw_selector(selector);
        let results = ResultSerializer::serialize(self.backend.query(&selector)?)?;
        Self::log_query("selector", results.len());
        Ok(results)
    }

    /// Returns every version of `key`, oldest first.
    pub fn history(&self, key: &RecordKey) -> RecordResult<Vec<HistoryEntry>> {
        let cursor = self.backend.history_of(key.as_str())?;
        let entries = ResultSerializer::serialize_history(key, cursor)?;
        let count = entries.len().to_string();
        log_event_with_fields(
            Event::HistoryRead,
            &[("entries", count.as_str()), ("key", key.as_str())],
        );
        Ok(entries)
    }

    fn log_query(kind: &str, rows: usize) {
        let rows = rows.to_string();
        log_event_with_fields(Event::QueryExecuted, &[("kind", kind), ("rows", rows.as_str())]);
    }
}
