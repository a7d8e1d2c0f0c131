//! Record store engine
//!
//! Orchestrates key derivation, the versioned store and the query backend.
//!
//! # Invariants Enforced
//!
//! - Create never overwrites a current value (`AlreadyExists`, no write)
//! - Update and delete require a current value (`NotFound`, no write)
//! - Undecodable stored bytes block delete (`CorruptRecord`, no write)
//! - Each successful write operation issues exactly one backend write
//! - Query and history results preserve backend order
//! - Backend cursors are closed on every exit path
//!
//! Atomicity of the check-then-write sequences is the backend's concern.

mod errors;
mod selector;
mod serializer;
mod store;

pub use errors::{RecordError, RecordResult};
pub use selector::{equality_selector, raw_selector};
pub use serializer::{HistoryEntry, KeyedRecord, ResultSerializer};
pub use store::RecordStore;
