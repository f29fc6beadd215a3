//! Timeline engine — read, merge, mutate and write back one timeline key.
//!
//! Every operation rebuilds the timeline from whatever the store returns:
//! there is no cache, lock or compare-and-set. Concurrent writers may fork
//! a key into siblings; the next read merges them and, if it saw more than
//! one, writes the merged result back (read-repair).

use serde_json::Value;
use std::sync::Arc;
use timak_crdt::{TimelineState, merge_all};
use timak_storage::{Siblings, TimelineStore, VersionToken};
use timak_types::{Entry, IntoScore, WriteClock};
use tracing::{debug, warn};

use crate::codec::{self, TimelineItem};
use crate::config::TimelineConfig;
use crate::error::{CodecError, TimelineError, TimelineResult};

/// A reconciled read of one key.
struct Snapshot {
    state: TimelineState,
    /// Token the next write should carry. `None` when a sibling could not
    /// be decoded, so that writes leave it in place.
    context: Option<VersionToken>,
    siblings: usize,
    undecodable: usize,
}

/// A bounded, ranked timeline stored under many keys of one namespace.
pub struct Timeline {
    store: Arc<dyn TimelineStore>,
    config: TimelineConfig,
    clock: Arc<WriteClock>,
}

impl Timeline {
    /// Creates a timeline over `store`.
    pub fn new(store: Arc<dyn TimelineStore>, config: TimelineConfig) -> TimelineResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            clock: Arc::new(WriteClock::new()),
        })
    }

    /// Replaces the clock that stamps `modified` on local writes.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<WriteClock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    // ── Reads ────────────────────────────────────────────────────

    /// Returns the visible items of `key` in rank order.
    pub async fn get(&self, key: &str) -> TimelineResult<Vec<TimelineItem>> {
        let entries = self.get_raw(key).await?;
        Ok(codec::to_external(&entries))
    }

    /// Returns the ranked entries of `key`, tombstones included.
    ///
    /// If the store returned siblings, the merged timeline is written back
    /// once. A failure of that write is logged and otherwise ignored. No
    /// repair is attempted while any sibling is undecodable.
    pub async fn get_raw(&self, key: &str) -> TimelineResult<Vec<Entry>> {
        let snapshot = self.fetch(key).await?;
        let sorted = self.rank(snapshot.state);

        if snapshot.undecodable > 0 {
            warn!(
                "Not repairing {}/{}: {} of {} siblings undecodable",
                self.config.namespace, key, snapshot.undecodable, snapshot.siblings
            );
        } else if snapshot.siblings > 1 {
            debug!(
                "Repairing {}/{} from {} siblings ({} entries)",
                self.config.namespace,
                key,
                snapshot.siblings,
                sorted.len()
            );
            if let Err(e) = self.store_sorted(key, &sorted, snapshot.context).await {
                warn!(
                    "Read-repair of {}/{} failed, leaving siblings: {}",
                    self.config.namespace, key, e
                );
            }
        }

        Ok(sorted)
    }

    // ── Writes ───────────────────────────────────────────────────

    /// Adds `id` to `key`, replacing any entry (or tombstone) it had.
    ///
    /// Returns the visible items after the write.
    pub async fn add(
        &self,
        key: &str,
        id: impl Into<String>,
        score: impl IntoScore,
        data: Option<Value>,
    ) -> TimelineResult<Vec<TimelineItem>> {
        let entries = self.add_raw(key, id, score, data).await?;
        Ok(codec::to_external(&entries))
    }

    /// Like [`add`](Self::add), returning the ranked entries.
    pub async fn add_raw(
        &self,
        key: &str,
        id: impl Into<String>,
        score: impl IntoScore,
        data: Option<Value>,
    ) -> TimelineResult<Vec<Entry>> {
        let entry = Entry::new(id, score.into_score()?, 0, data)?;
        self.upsert(key, entry).await
    }

    /// Tombstones `id` in `key`.
    ///
    /// `score` positions the tombstone for capacity truncation; pass the
    /// score the entry was added with to have it evicted where the live
    /// entry would have been. It is hidden from readers either way.
    pub async fn delete(
        &self,
        key: &str,
        id: impl Into<String>,
        score: impl IntoScore,
    ) -> TimelineResult<Vec<TimelineItem>> {
        let entries = self.delete_raw(key, id, score).await?;
        Ok(codec::to_external(&entries))
    }

    /// Like [`delete`](Self::delete), returning the ranked entries.
    pub async fn delete_raw(
        &self,
        key: &str,
        id: impl Into<String>,
        score: impl IntoScore,
    ) -> TimelineResult<Vec<Entry>> {
        let entry = Entry::tombstone(id, score.into_score()?, 0)?;
        self.upsert(key, entry).await
    }

    // ── Internals ────────────────────────────────────────────────

    /// Read-modify-write of one id. Siblings are merged but not repaired
    /// separately; this write carries the merged result. If a sibling was
    /// undecodable the write goes out without a context and forks.
    async fn upsert(&self, key: &str, mut entry: Entry) -> TimelineResult<Vec<Entry>> {
        let mut snapshot = self.fetch(key).await?;

        entry.modified = self.clock.tick();
        debug!(
            "Writing {} {} to {}/{} (score {}, modified {})",
            if entry.deleted { "tombstone" } else { "entry" },
            entry.id,
            self.config.namespace,
            key,
            entry.score,
            entry.modified
        );
        snapshot.state.upsert(entry);

        let sorted = self.rank(snapshot.state);
        self.store_sorted(key, &sorted, snapshot.context).await?;
        Ok(sorted)
    }

    /// Reads every sibling of `key` and merges the decodable ones.
    async fn fetch(&self, key: &str) -> TimelineResult<Snapshot> {
        let siblings = self.store.get(&self.config.namespace, key).await?;
        let count = siblings.len();
        let mut context = siblings.context().cloned();
        let mut undecodable = 0;

        let state = match siblings {
            Siblings::Empty => TimelineState::new(),
            Siblings::Single(version) => codec::to_state(codec::decode(&version.value)?),
            Siblings::Diverged(versions) => {
                debug!(
                    "Conflict on {}/{}: {} siblings",
                    self.config.namespace,
                    key,
                    versions.len()
                );
                let mut states = Vec::with_capacity(versions.len());
                let mut last_error: Option<CodecError> = None;
                for (index, version) in versions.iter().enumerate() {
                    match codec::decode(&version.value) {
                        Ok(entries) => states.push(codec::to_state(entries)),
                        Err(e) => {
                            warn!(
                                "Skipping undecodable sibling {} of {}/{}: {}",
                                index, self.config.namespace, key, e
                            );
                            last_error = Some(e);
                            undecodable += 1;
                        }
                    }
                }
                if let Some(e) = last_error.filter(|_| states.is_empty()) {
                    return Err(TimelineError::Decode(e));
                }
                if undecodable > 0 {
                    context = None;
                }
                merge_all(states)
            }
        };

        Ok(Snapshot {
            state,
            context,
            siblings: count,
            undecodable,
        })
    }

    fn rank(&self, state: TimelineState) -> Vec<Entry> {
        codec::to_sorted(state, self.config.order, self.config.max_items)
    }

    async fn store_sorted(
        &self,
        key: &str,
        sorted: &[Entry],
        context: Option<VersionToken>,
    ) -> TimelineResult<()> {
        let raw = codec::encode(sorted)?;
        self.store
            .put(&self.config.namespace, key, raw, context)
            .await?;
        Ok(())
    }
}
