//! Error types for timeline operations.

use thiserror::Error;
use timak_storage::StoreError;

/// Result type for timeline operations.
pub type TimelineResult<T> = Result<T, TimelineError>;

/// Result type for the persisted format.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur in timeline operations.
#[derive(Debug, Error)]
pub enum TimelineError {
    /// The store failed a read or a write.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// No stored version of the timeline could be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] CodecError),

    /// Rejected before touching the store.
    #[error("invalid entry: {0}")]
    InvalidEntry(String),

    /// Configuration that cannot back a timeline.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl From<timak_types::Error> for TimelineError {
    fn from(err: timak_types::Error) -> Self {
        match err {
            timak_types::Error::InvalidEntry(reason) => TimelineError::InvalidEntry(reason),
        }
    }
}

/// Errors in the persisted timeline format.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Not a JSON array of entry records.
    #[error("malformed timeline: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Well-formed JSON holding an entry no writer could have produced.
    #[error("invalid stored entry: {0}")]
    InvalidEntry(String),
}
