//! Backend error types
//!
//! Collaborator failures are carried with their original message. The
//! record store surfaces them unchanged and never retries.

use thiserror::Error;

/// Result type for backend calls
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors reported by a versioned store or query backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The backend call failed (I/O, unreachable peer, corrupt journal)
    #[error("{0}")]
    Unavailable(String),

    /// The query backend rejected a selector
    #[error("{0}")]
    QuerySyntax(String),
}

impl BackendError {
    /// Create an unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        BackendError::Unavailable(message.into())
    }

    /// Create a selector syntax error
    pub fn query_syntax(message: impl Into<String>) -> Self {
        BackendError::QuerySyntax(message.into())
    }

    /// Returns the collaborator-supplied message
    pub fn message(&self) -> &str {
        match self {
            BackendError::Unavailable(m) | BackendError::QuerySyntax(m) => m,
        }
    }
}
