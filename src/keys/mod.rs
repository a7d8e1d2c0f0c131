//! Record keys and content-addressed key derivation
//!
//! A key is either supplied by the caller (opaque) or derived from the
//! identifying attributes of a record. Derived keys make two registrations
//! of the same real-world entity collide on the same key, which is what
//! duplicate prevention in `ledger::RecordStore::create` relies on.

mod deriver;
mod record_key;

pub use deriver::{KeyDeriver, DERIVED_KEY_LEN};
pub use record_key::RecordKey;
