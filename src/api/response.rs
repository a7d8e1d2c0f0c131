//! Response envelopes
//!
//! `{"status":"ok","data":..}` on success and
//! `{"status":"error","code":..,"message":..}` on failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ledger::RecordError;

/// Success response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub status: String,
    pub data: Value,
}

impl SuccessResponse {
    /// Create a new success response
    pub fn new(data: Value) -> Self {
        Self {
            status: "ok".to_string(),
            data,
        }
    }

    /// Create an empty success response
    pub fn empty() -> Self {
        Self {
            status: "ok".to_string(),
            data: Value::Null,
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("SuccessResponse serialization cannot fail")
    }
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    /// Create from a record store error
    pub fn from_error(err: &RecordError) -> Self {
        Self {
            status: "error".to_string(),
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("ErrorResponse serialization cannot fail")
    }
}

/// Unified response type
#[derive(Debug, Clone)]
pub enum Response {
    Success(SuccessResponse),
    Error(ErrorResponse),
}

impl Response {
    /// Create a success response
    pub fn success(data: Value) -> Self {
        Response::Success(SuccessResponse::new(data))
    }

    /// Create an empty success response
    pub fn ok() -> Self {
        Response::Success(SuccessResponse::empty())
    }

    /// Create an error response
    pub fn error(err: &RecordError) -> Self {
        Response::Error(ErrorResponse::from_error(err))
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        match self {
            Response::Success(r) => r.to_json(),
            Response::Error(r) => r.to_json(),
        }
    }

    /// Check if this is a success response
    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success(_))
    }

    /// Error code, if this is an error response
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Response::Success(_) => None,
            Response::Error(r) => Some(r.code.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::RecordKey;
    use serde_json::json;

    #[test]
    fn test_success_response() {
        let resp = SuccessResponse::new(json!([{"key": "k1", "record": {"name": "Alice"}}]));
        let json = resp.to_json();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("Alice"));
    }

    #[test]
    fn test_empty_success_has_null_data() {
        assert_eq!(Response::ok().to_json(), r#"{"status":"ok","data":null}"#);
    }

    #[test]
    fn test_error_response() {
        let err = RecordError::NotFound(RecordKey::from("id9"));
        let resp = Response::error(&err);
        assert!(!resp.is_success());
        assert_eq!(resp.error_code(), Some("REC_NOT_FOUND"));

        let value: Value = serde_json::from_str(&resp.to_json()).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["message"], "Record does not exist: id9");
    }
}
