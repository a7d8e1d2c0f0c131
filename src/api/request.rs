//! Request envelope
//!
//! Line-oriented callers send `{"op": "<operation>", "args": ["..", ..]}`.
//! A missing `args` field means no arguments.

use serde::{Deserialize, Serialize};

use crate::ledger::{RecordError, RecordResult};

/// One raw request, before command parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub op: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Request {
    pub fn new(op: impl Into<String>, args: Vec<String>) -> Self {
        Self { op: op.into(), args }
    }

    /// Parse a JSON request line.
    pub fn parse(json: &str) -> RecordResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| RecordError::InvalidArgument(format!("Invalid request JSON: {}", e)))
    }
}
