//! Content-addressed key derivation
//!
//! derive(v1, v2, ..., vn) = lower-case hex SHA-256 of v1 || v2 || ... || vn
//!
//! Values are concatenated with no separator. The attribute order used for
//! records is `name`, `phone`, `id`; changing it changes every derived key
//! and is a breaking schema change.

use sha2::{Digest, Sha256};

use super::RecordKey;
use crate::record::Record;

/// Length of a derived key in hex characters.
pub const DERIVED_KEY_LEN: usize = 64;

/// Pure, deterministic key derivation.
pub struct KeyDeriver;

impl KeyDeriver {
    /// Derives a key from attribute values given in their documented order.
    pub fn derive(ordered_values: &[&str]) -> RecordKey {
        let mut hasher = Sha256::new();
        for value in ordered_values {
            hasher.update(value.as_bytes());
        }
        RecordKey::new(format!("{:x}", hasher.finalize()))
    }

    /// Derives the content address of a record from (name, phone, id).
    ///
    /// The free-form `identifier` attribute does not take part.
    pub fn for_record(record: &Record) -> RecordKey {
        Self::derive(&[record.name.as_str(), record.phone.as_str(), record.id.as_str()])
    }
}
