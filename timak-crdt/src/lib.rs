//! Conflict resolution for Timak timelines.
//!
//! A sibling-producing store can return several concurrently written
//! versions of one timeline. Each version decodes to a [`TimelineState`]
//! and the states are folded into one with [`merge_all`].
//!
//! Merging is an entry-wise last-writer-wins over `modified`, so it is:
//! - **Commutative**: merge(a, b) == merge(b, a)
//! - **Associative**: merge(merge(a, b), c) == merge(a, merge(b, c))
//! - **Idempotent**: merge(a, a) == a
//!
//! Ties on `modified` are broken by [`supersedes`], which depends only on
//! the two entries involved.

mod state;

pub use state::{TimelineState, merge_all, supersedes};
