//! Core type definitions for Timak.
//!
//! This crate defines the value types shared by every layer of a timeline:
//! - [`Entry`], one ranked item of a timeline (live or tombstoned)
//! - [`Order`], the direction a timeline is ranked in
//! - [`IntoScore`], normalization of caller-supplied scores to integers
//! - [`WriteClock`], the write-local millisecond clock behind `modified`
//!
//! Storage, conflict resolution and the engine itself live in their own crates.

mod clock;
mod entry;
mod score;

pub use clock::{WriteClock, now_millis};
pub use entry::{Entry, Order};
pub use score::IntoScore;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building entries.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The id is empty or the score cannot be represented.
    #[error("invalid entry: {0}")]
    InvalidEntry(String),
}
