//! Record store error types
//!
//! Error codes:
//! - REC_INVALID_ARGUMENT_COUNT
//! - REC_INVALID_ARGUMENT
//! - REC_UNKNOWN_OPERATION
//! - REC_ALREADY_EXISTS
//! - REC_NOT_FOUND
//! - REC_CORRUPT_RECORD
//! - REC_BACKEND_UNAVAILABLE
//! - REC_QUERY_SYNTAX
//!
//! Argument errors are raised before any backend call. Backend messages
//! are passed through unchanged.

use thiserror::Error;

use crate::backend::BackendError;
use crate::keys::RecordKey;

/// Result type for record store operations
pub type RecordResult<T> = Result<T, RecordError>;

/// Record store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("Incorrect number of arguments for {operation}. Expecting {expected}, got {actual}")]
    InvalidArgumentCount {
        operation: String,
        expected: String,
        actual: usize,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Record already exists: {0}")]
    AlreadyExists(RecordKey),

    #[error("Record does not exist: {0}")]
    NotFound(RecordKey),

    #[error("Failed to decode record {key}: {reason}")]
    CorruptRecord { key: RecordKey, reason: String },

    #[error("{0}")]
    BackendUnavailable(String),

    #[error("{0}")]
    QuerySyntaxError(String),
}

impl RecordError {
    /// Create a corrupt record error
    pub fn corrupt(key: impl Into<RecordKey>, reason: impl ToString) -> Self {
        RecordError::CorruptRecord {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            RecordError::InvalidArgumentCount { .. } => "REC_INVALID_ARGUMENT_COUNT",
            RecordError::InvalidArgument(_) => "REC_INVALID_ARGUMENT",
            RecordError::UnknownOperation(_) => "REC_UNKNOWN_OPERATION",
            RecordError::AlreadyExists(_) => "REC_ALREADY_EXISTS",
            RecordError::NotFound(_) => "REC_NOT_FOUND",
            RecordError::CorruptRecord { .. } => "REC_CORRUPT_RECORD",
            RecordError::BackendUnavailable(_) => "REC_BACKEND_UNAVAILABLE",
            RecordError::QuerySyntaxError(_) => "REC_QUERY_SYNTAX",
        }
    }

    /// Returns true if the caller's input caused the error
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            RecordError::CorruptRecord { .. } | RecordError::BackendUnavailable(_)
        )
    }
}

impl From<BackendError> for RecordError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unavailable(m) => RecordError::BackendUnavailable(m),
            BackendError::QuerySyntax(m) => RecordError::QuerySyntaxError(m),
        }
    }
}
