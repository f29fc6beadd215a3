//! Error types for the storage layer.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors a store can report.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport or backend failure.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A version token that this store did not issue.
    #[error("invalid version token: {0}")]
    InvalidToken(String),
}
