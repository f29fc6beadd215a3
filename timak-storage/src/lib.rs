//! Storage layer for Timak.
//!
//! Timak sits on top of an eventually-consistent key-value store that keeps
//! concurrent writes to one key as *siblings* instead of picking a winner.
//! This crate defines the contract such a store has to meet and ships an
//! in-process implementation of it.
//!
//! # Architecture
//!
//! - [`TimelineStore`] is the read/write contract the engine is written against
//! - A read yields [`Siblings`]: nothing, one converged [`Version`], or several
//! - Each version carries an opaque [`VersionToken`] that is handed back on write
//! - [`MemoryStore`] forks siblings on concurrent writes, for tests and embedding
//!
//! Transport concerns (connections, auth, retries, timeouts) belong to the
//! store implementation, not to callers of this trait.

mod error;
mod memory;
mod siblings;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use siblings::{Siblings, Version, VersionToken};

use async_trait::async_trait;

/// A multi-version key-value store addressed by namespace and key.
#[async_trait]
pub trait TimelineStore: Send + Sync {
    /// Reads every unreconciled version of `key`.
    async fn get(&self, namespace: &str, key: &str) -> StoreResult<Siblings>;

    /// Writes `value` to `key`.
    ///
    /// `context` is the token of a version returned by an earlier read; the
    /// write supersedes what that read observed. Without a context, or when
    /// another writer got there first, the store may keep the write as an
    /// additional sibling. No compare-and-set is implied.
    async fn put(
        &self,
        namespace: &str,
        key: &str,
        value: Vec<u8>,
        context: Option<VersionToken>,
    ) -> StoreResult<()>;
}
