//! Command handler
//!
//! Executes one command at a time against a `RecordStore` held behind a
//! mutex. Every variant of `Command` has its own handler method.
//!
//! Request flow:
//! 1. Parse the operation name and arguments into a `Command`
//! 2. Acquire the store lock
//! 3. Dispatch to the variant's handler
//! 4. Wrap the result in a response envelope
//!
//! Parsing failures never reach the store. Both parsing failures and
//! client errors raised by the store count as rejections.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde_json::{json, Value};

use super::command::Command;
use super::request::Request;
use super::response::Response;
use crate::backend::LedgerBackend;
use crate::keys::RecordKey;
use crate::ledger::{RecordError, RecordResult, RecordStore};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::record::{Attribute, Record, RecordPatch};

/// Serialized command execution over a record store
pub struct CommandHandler<B> {
    /// Store guarded by the execution lock
    store: Mutex<RecordStore<B>>,

    /// Operation counters
    metrics: MetricsRegistry,
}

impl<B: LedgerBackend> CommandHandler<B> {
    /// Create a handler over `backend`
    pub fn new(backend: B) -> Self {
        Self::with_store(RecordStore::new(backend))
    }

    /// Create a handler over an existing store
    pub fn with_store(store: RecordStore<B>) -> Self {
        Self {
            store: Mutex::new(store),
            metrics: MetricsRegistry::new(),
        }
    }

    /// Counters for commands handled so far
    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    /// Consumes the handler and returns the store
    pub fn into_store(self) -> RecordStore<B> {
        self.store.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    /// Handle a raw JSON request line
    pub fn handle_line(&self, line: &str) -> Response {
        match Request::parse(line) {
            Ok(request) => self.handle(&request.op, &request.args),
            Err(e) => self.reject("", e),
        }
    }

    /// Handle an operation name with positional arguments
    pub fn handle(&self, op: &str, args: &[String]) -> Response {
        let command = match Command::parse(op, args) {
            Ok(c) => c,
            Err(e) => return self.reject(op, e),
        };

        match self.execute(command) {
            Ok(data) => Response::success(data),
            Err(e) if e.is_client_error() => self.reject(op, e),
            Err(e) => {
                log_event_with_fields(
                    Event::CommandFailed,
                    &[("code", e.code()), ("op", op)],
                );
                Response::error(&e)
            }
        }
    }

    /// Execute a parsed command and return its JSON result
    pub fn execute(&self, command: Command) -> RecordResult<Value> {
        let mut store = self.lock();

        match command {
            Command::CreateRecord { key, record } => self.handle_create(&mut store, key, record),
            Command::GetAllRecords => self.handle_get_all(&store),
            Command::GetRecordByKey { key } => self.handle_get(&store, key),
            Command::QueryByAttribute { attribute, value } => {
                self.handle_query_by_attribute(&store, attribute, &value)
            }
            Command::QueryBySelector { selector } => {
                self.handle_query_by_selector(&store, &selector)
            }
            Command::GetRecordHistory { key } => self.handle_history(&store, key),
            Command::UpdateRecord { key, patch } => self.handle_update(&mut store, key, patch),
            Command::DeleteRecord { key } => self.handle_delete(&mut store, key),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RecordStore<B>> {
        // Commands issue at most one backend write; a poisoned store is consistent.
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn reject(&self, op: &str, err: RecordError) -> Response {
        self.metrics.increment_rejected();
        log_event_with_fields(
            Event::CommandRejected,
            &[("code", err.code()), ("op", op)],
        );
        Response::error(&err)
    }

    fn handle_create(
        &self,
        store: &mut RecordStore<B>,
        key: Option<RecordKey>,
        record: Record,
    ) -> RecordResult<Value> {
        let key = store.create(key, &record)?;
        self.metrics.increment_created();
        Ok(json!({ "key": key }))
    }

    fn handle_get_all(&self, store: &RecordStore<B>) -> RecordResult<Value> {
        let records = store.list_all()?;
        self.metrics.increment_queries();
        to_value(&records)
    }

    fn handle_get(&self, store: &RecordStore<B>, key: RecordKey) -> RecordResult<Value> {
        let record = store.get(&key)?;
        self.metrics.increment_reads();
        to_value(&record)
    }

    fn handle_query_by_attribute(
        &self,
        store: &RecordStore<B>,
        attribute: Attribute,
        value: &str,
    ) -> RecordResult<Value> {
        let records = store.query_by_attribute(attribute, value)?;
        self.metrics.increment_queries();
        to_value(&records)
    }

    fn handle_query_by_selector(
        &self,
        store: &RecordStore<B>,
        selector: &str,
    ) -> RecordResult<Value> {
        let records = store.query_by_selector(selector)?;
        self.metrics.increment_queries();
        to_value(&records)
    }

    fn handle_history(&self, store: &RecordStore<B>, key: RecordKey) -> RecordResult<Value> {
        let history = store.history(&key)?;
        self.metrics.increment_history_reads();
        to_value(&history)
    }

    fn handle_update(
        &self,
        store: &mut RecordStore<B>,
        key: RecordKey,
        patch: RecordPatch,
    ) -> RecordResult<Value> {
        store.update(&key, &patch)?;
        self.metrics.increment_updated();
        Ok(Value::Null)
    }

    fn handle_delete(&self, store: &mut RecordStore<B>, key: RecordKey) -> RecordResult<Value> {
        store.delete(&key)?;
        self.metrics.increment_deleted();
        Ok(Value::Null)
    }
}

fn to_value<T: Serialize>(value: &T) -> RecordResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| RecordError::InvalidArgument(format!("Failed to encode result: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryStore, TxIdMode};

    fn handler() -> CommandHandler<MemoryStore> {
        CommandHandler::new(MemoryStore::with_tx_mode(TxIdMode::Sequential))
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn data(resp: Response) -> Value {
        match resp {
            Response::Success(s) => s.data,
            Response::Error(e) => panic!("unexpected error: {} {}", e.code, e.message),
        }
    }

    #[test]
    fn test_create_then_get() {
        let h = handler();
        let created = data(h.handle("createRecord", &args(&["id1", "A", "555", "X"])));
        assert_eq!(created, json!({"key": "id1"}));

        let record = data(h.handle("getRecordByKey", &args(&["id1"])));
        assert_eq!(record, json!({"name": "A", "phone": "555", "id": "X"}));
    }

    #[test]
    fn test_get_missing_is_null() {
        let h = handler();
        assert_eq!(data(h.handle("getRecordByKey", &args(&["nope"]))), Value::Null);
    }

    #[test]
    fn test_wrong_arg_count_touches_nothing() {
        let h = handler();
        let resp = h.handle("createRecord", &args(&["a", "b"]));
        assert_eq!(resp.error_code(), Some("REC_INVALID_ARGUMENT_COUNT"));
        assert_eq!(h.metrics().snapshot().commands_rejected, 1);

        let store = h.into_store();
        assert_eq!(store.backend().entry_count(), 0);
    }

    #[test]
    fn test_unknown_operation_rejected() {
        let h = handler();
        let resp = h.handle("truncate", &[]);
        assert_eq!(resp.error_code(), Some("REC_UNKNOWN_OPERATION"));
    }

    #[test]
    fn test_duplicate_create_is_error_response() {
        let h = handler();
        h.handle("createRecord", &args(&["A", "555", "X"]));
        let resp = h.handle("createRecord", &args(&["A", "555", "X"]));
        assert_eq!(resp.error_code(), Some("REC_ALREADY_EXISTS"));

        let snapshot = h.metrics().snapshot();
        assert_eq!(snapshot.records_created, 1);
        assert_eq!(snapshot.commands_rejected, 1);
    }

    #[test]
    fn test_execution_errors_count_as_rejections() {
        let h = handler();
        let missing = h.handle("deleteRecord", &args(&["ghost"]));
        assert_eq!(missing.error_code(), Some("REC_NOT_FOUND"));
        let bad_selector = h.handle("queryRecordsBySelector", &args(&["{"]));
        assert_eq!(bad_selector.error_code(), Some("REC_QUERY_SYNTAX"));

        let snapshot = h.metrics().snapshot();
        assert_eq!(snapshot.commands_rejected, 2);
        assert_eq!(snapshot.records_deleted, 0);
        assert_eq!(snapshot.queries_executed, 0);
    }

    #[test]
    fn test_query_by_name_is_case_insensitive() {
        let h = handler();
        h.handle("createRecord", &args(&["k1", "Alice", "555", "X"]));
        h.handle("createRecord", &args(&["k2", "Bob", "556", "Y"]));

        let rows = data(h.handle("queryRecordsByName", &args(&["ALICE"])));
        assert_eq!(
            rows,
            json!([{"key": "k1", "record": {"name": "Alice", "phone": "555", "id": "X"}}])
        );
    }

    #[test]
    fn test_get_all_in_key_order() {
        let h = handler();
        h.handle("createRecord", &args(&["b", "B", "", ""]));
        h.handle("createRecord", &args(&["a", "A", "", ""]));

        let rows = data(h.handle("getAllRecords", &[]));
        let keys: Vec<&str> = rows
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["key"].as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_update_delete_history() {
        let h = handler();
        h.handle("createRecord", &args(&["id1", "A", "555", "X"]));
        assert_eq!(
            data(h.handle("updateRecord", &args(&["id1", "", "556", ""]))),
            Value::Null
        );
        assert_eq!(data(h.handle("deleteRecord", &args(&["id1"]))), Value::Null);

        let history = data(h.handle("getRecordHistory", &args(&["id1"])));
        let entries = history.as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1]["value"]["phone"], "556");
        assert_eq!(entries[1]["value"]["name"], "A");
        assert!(entries[2]["value"].is_null());
        assert_eq!(entries[2]["isDelete"], true);

        let snapshot = h.metrics().snapshot();
        assert_eq!(snapshot.records_updated, 1);
        assert_eq!(snapshot.records_deleted, 1);
        assert_eq!(snapshot.history_reads, 1);
    }

    #[test]
    fn test_selector_syntax_error() {
        let h = handler();
        let resp = h.handle("queryRecordsBySelector", &args(&["not json"]));
        assert_eq!(resp.error_code(), Some("REC_QUERY_SYNTAX"));
    }

    #[test]
    fn test_handle_line() {
        let h = handler();
        let resp = h.handle_line(r#"{"op":"createRecord","args":["id1","A","555","X"]}"#);
        assert!(resp.is_success());

        let resp = h.handle_line("garbage");
        assert_eq!(resp.error_code(), Some("REC_INVALID_ARGUMENT"));
    }
}
