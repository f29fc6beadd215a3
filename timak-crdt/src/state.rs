//! The reconciled id → entry map.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::collections::hash_map::Entry as Slot;
use timak_types::Entry;

/// Conflict-free view of one timeline: at most one entry per id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineState {
    entries: HashMap<String, Entry>,
}

impl TimelineState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry stored for `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.get(id)
    }

    /// Returns true if an entry (live or tombstoned) exists for `id`.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of entries, tombstones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Consumes the state, yielding its entries in no particular order.
    pub fn into_entries(self) -> impl Iterator<Item = Entry> {
        self.entries.into_values()
    }

    /// Stores `entry` under its id, replacing whatever was there.
    ///
    /// This is the local write path: no timestamp comparison is made.
    /// Returns the replaced entry.
    pub fn upsert(&mut self, entry: Entry) -> Option<Entry> {
        self.entries.insert(entry.id.clone(), entry)
    }

    /// Offers a concurrently written `entry` to this state.
    ///
    /// The entry is taken if its id is unknown or it [`supersedes`] the
    /// stored one. Returns true if the state changed.
    pub fn offer(&mut self, entry: Entry) -> bool {
        match self.entries.entry(entry.id.clone()) {
            Slot::Vacant(slot) => {
                slot.insert(entry);
                true
            }
            Slot::Occupied(mut slot) => {
                if supersedes(&entry, slot.get()) {
                    slot.insert(entry);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Merges a sibling state into this one.
    ///
    /// This operation is:
    /// - Commutative: merge(a, b) == merge(b, a)
    /// - Associative: merge(merge(a, b), c) == merge(a, merge(b, c))
    /// - Idempotent: merge(a, a) == a
    pub fn merge(&mut self, other: &Self) {
        for entry in other.entries.values() {
            self.offer(entry.clone());
        }
    }

    /// Creates a new state that is the merge of this and another.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.merge(other);
        result
    }
}

/// Builds a state from a decoded sequence.
///
/// Well-formed writers never repeat an id; if one does, the later entry in
/// iteration order wins.
impl FromIterator<Entry> for TimelineState {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        let mut state = Self::new();
        for entry in iter {
            state.upsert(entry);
        }
        state
    }
}

/// Left-folds [`TimelineState::merge`] over every sibling state.
///
/// O(N·M) for N siblings of M entries each. An empty input yields an empty
/// state.
pub fn merge_all<I>(states: I) -> TimelineState
where
    I: IntoIterator<Item = TimelineState>,
{
    let mut states = states.into_iter();
    let Some(mut merged) = states.next() else {
        return TimelineState::new();
    };
    for state in states {
        merged.merge(&state);
    }
    merged
}

/// Decides whether `incoming` should replace `current` for the same id.
///
/// The later `modified` wins. When both were written at the same
/// millisecond the versions are ranked by, in turn:
/// 1. a tombstone over a live entry
/// 2. the higher score
/// 3. the greater canonical JSON of `data` (absent below any payload)
///
/// Identical entries never replace each other.
#[must_use]
pub fn supersedes(incoming: &Entry, current: &Entry) -> bool {
    compare_versions(incoming, current) == Ordering::Greater
}

fn compare_versions(a: &Entry, b: &Entry) -> Ordering {
    a.modified
        .cmp(&b.modified)
        .then_with(|| a.deleted.cmp(&b.deleted))
        .then_with(|| a.score.cmp(&b.score))
        .then_with(|| canonical_data(a).cmp(&canonical_data(b)))
}

fn canonical_data(entry: &Entry) -> Option<String> {
    entry.data.as_ref().map(|value| value.to_string())
}
