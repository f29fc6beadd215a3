//! Bounded, rank-ordered timelines over sibling-producing key-value stores.
//!
//! A [`Timeline`] keeps, per key, the `max_items` best-ranked entries by
//! score, e.g. "latest N activity items". It tolerates a store that keeps
//! concurrent writes as siblings: reads merge them entry by entry and
//! opportunistically write the result back.
//!
//! ## Components
//!
//! - **Codec**: the persisted JSON format, ranking, truncation and reader view
//! - **Config**: namespace, order and window size of a timeline
//! - **Engine**: `get` / `add` / `delete` against a [`TimelineStore`]
//!
//! ## Deletes
//!
//! `delete` writes a tombstone instead of removing the entry so the delete
//! wins over stale siblings. Tombstones are never collected on their own:
//! they leave the timeline when ranked out of the window or overwritten by a
//! later `add` of the same id.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use timak_storage::MemoryStore;
//! use timak_timeline::{Timeline, TimelineConfig, TimelineItem};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let timeline = Timeline::new(
//!     Arc::new(MemoryStore::new()),
//!     TimelineConfig::default().with_max_items(2),
//! )
//! .unwrap();
//!
//! timeline.add("user:1", "a", 1, None).await.unwrap();
//! timeline.add("user:1", "b", 2, None).await.unwrap();
//! let items = timeline.add("user:1", "c", 3, None).await.unwrap();
//!
//! assert_eq!(items, vec![TimelineItem::Id("c".into()), TimelineItem::Id("b".into())]);
//! # });
//! ```

pub mod codec;
mod config;
mod engine;
mod error;

pub use codec::TimelineItem;
pub use config::{DEFAULT_MAX_ITEMS, DEFAULT_NAMESPACE, TimelineConfig};
pub use engine::Timeline;
pub use error::{CodecError, CodecResult, TimelineError, TimelineResult};

pub use timak_storage::{MemoryStore, Siblings, StoreError, TimelineStore, Version, VersionToken};
pub use timak_types::{Entry, IntoScore, Order};
