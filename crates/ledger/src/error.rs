//! Ledger error types.

use domain::OrderError;
use storage::StorageError;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The request payload violates a business rule.
    #[error("{0}")]
    Validation(String),

    /// The referenced record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The caller is not allowed to perform this operation.
    #[error("{0}")]
    Forbidden(String),

    /// The record exists but is not in a state that allows the operation.
    #[error("{0}")]
    InvalidState(String),

    /// The backing store failed.
    #[error("storage error: {0}")]
    Storage(StorageError),
}

impl LedgerError {
    pub fn not_found(kind: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }
}

impl From<StorageError> for LedgerError {
    fn from(err: StorageError) -> Self {
        match err {
            // A missing record surfacing from the store is a client-visible
            // 404, not an internal failure.
            StorageError::NotFound { kind, id } => LedgerError::NotFound { kind, id },
            other => LedgerError::Storage(other),
        }
    }
}

impl From<OrderError> for LedgerError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NoInquiry => LedgerError::InvalidState(err.to_string()),
            _ => LedgerError::Validation(err.to_string()),
        }
    }
}

/// Convenience type alias for ledger results.
pub type Result<T> = std::result::Result<T, LedgerError>;
