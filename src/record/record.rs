//! Record - the structured entity held by the store
//!
//! Encoded as a JSON object with lower-case field names. Every attribute is
//! present-or-empty; nothing is independently nullable. A record has no
//! identity of its own, the key is supplied externally.

use serde::{Deserialize, Serialize};

/// A stored record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub id: String,
    /// Free-form identifier, omitted from the encoding when empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub identifier: String,
}

impl Record {
    /// Creates a record from its identifying attributes.
    pub fn new(name: impl Into<String>, phone: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            id: id.into(),
            identifier: String::new(),
        }
    }

    /// Sets the free-form identifier.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Encodes the record to its stored byte form.
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Decodes a record from its stored byte form.
    pub fn from_bytes(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}
