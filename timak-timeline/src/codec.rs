//! Persisted timeline format and the views derived from it.
//!
//! A timeline is stored as a JSON array of entry records, already ranked
//! and cut to the configured window:
//!
//! ```json
//! [{"id": "b", "score": 2, "modified": 1700000000002, "data": {"text": "hi"}},
//!  {"id": "a", "score": 1, "modified": 1700000000001, "deleted": true}]
//! ```
//!
//! `data` and `deleted` are omitted when unset.

use serde::Serialize;
use serde_json::Value;
use timak_crdt::TimelineState;
use timak_types::{Entry, Order};

use crate::error::{CodecError, CodecResult};

/// What readers see of a live entry: its payload, or its id if it has none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TimelineItem {
    Data(Value),
    Id(String),
}

impl TimelineItem {
    /// The id, if this item has no payload.
    #[must_use]
    pub fn as_id(&self) -> Option<&str> {
        match self {
            TimelineItem::Id(id) => Some(id),
            TimelineItem::Data(_) => None,
        }
    }

    #[must_use]
    pub fn as_data(&self) -> Option<&Value> {
        match self {
            TimelineItem::Data(value) => Some(value),
            TimelineItem::Id(_) => None,
        }
    }
}

/// Parses a stored timeline.
pub fn decode(raw: &[u8]) -> CodecResult<Vec<Entry>> {
    let entries: Vec<Entry> = serde_json::from_slice(raw)?;
    if entries.iter().any(|e| e.id.is_empty()) {
        return Err(CodecError::InvalidEntry("entry with empty id".to_string()));
    }
    Ok(entries)
}

/// Serializes a ranked timeline for storage.
pub fn encode(entries: &[Entry]) -> CodecResult<Vec<u8>> {
    Ok(serde_json::to_vec(entries)?)
}

/// Builds the id → entry map. A repeated id keeps its later occurrence.
#[must_use]
pub fn to_state(entries: Vec<Entry>) -> TimelineState {
    entries.into_iter().collect()
}

/// Ranks every entry of `state` and keeps the first `limit`.
///
/// Ties on score are ordered by ascending id. Entries past the window are
/// dropped whatever their age.
#[must_use]
pub fn to_sorted(state: TimelineState, order: Order, limit: usize) -> Vec<Entry> {
    let mut entries: Vec<Entry> = state.into_entries().collect();
    entries.sort_unstable_by(|a, b| order.rank(a, b));
    entries.truncate(limit);
    entries
}

/// Reader view: tombstones removed, payloads (or ids) in rank order.
#[must_use]
pub fn to_external(entries: &[Entry]) -> Vec<TimelineItem> {
    entries
        .iter()
        .filter(|e| !e.is_tombstone())
        .map(|e| match &e.data {
            Some(data) => TimelineItem::Data(data.clone()),
            None => TimelineItem::Id(e.id.clone()),
        })
        .collect()
}

