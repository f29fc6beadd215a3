//! Shared test helpers for timeline tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use timak_storage::{MemoryStore, Siblings, StoreError, StoreResult, TimelineStore, VersionToken};
use timak_timeline::{Entry, Timeline, TimelineConfig, TimelineItem, codec};
use tokio::sync::Barrier;

pub const NS: &str = "timelines";

/// Installs a log subscriber honoring `RUST_LOG`; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn timeline(store: Arc<dyn TimelineStore>) -> Timeline {
    Timeline::new(store, TimelineConfig::default()).unwrap()
}

pub fn timeline_with(store: Arc<dyn TimelineStore>, config: TimelineConfig) -> Timeline {
    Timeline::new(store, config).unwrap()
}

pub fn id(s: &str) -> TimelineItem {
    TimelineItem::Id(s.to_string())
}

/// Ids of entries in order.
pub fn entry_ids(entries: &[Entry]) -> Vec<String> {
    entries.iter().map(|e| e.id.clone()).collect()
}

/// Writes `entries` as one more sibling of `key`, without a context.
pub async fn push_sibling(store: &MemoryStore, key: &str, entries: Vec<Entry>) {
    let raw = codec::encode(&entries).unwrap();
    store.put(NS, key, raw, None).await.unwrap();
}

/// Writes raw bytes as one more sibling of `key`.
pub async fn push_raw_sibling(store: &MemoryStore, key: &str, raw: &[u8]) {
    store.put(NS, key, raw.to_vec(), None).await.unwrap();
}

/// A store whose reads or writes can be switched to fail.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_gets: AtomicBool,
    pub fail_puts: AtomicBool,
    pub puts: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TimelineStore for FlakyStore {
    async fn get(&self, namespace: &str, key: &str) -> StoreResult<Siblings> {
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("get refused".into()));
        }
        self.inner.get(namespace, key).await
    }

    async fn put(
        &self,
        namespace: &str,
        key: &str,
        value: Vec<u8>,
        context: Option<VersionToken>,
    ) -> StoreResult<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("put refused".into()));
        }
        self.inner.put(namespace, key, value, context).await
    }
}

/// A store that holds every reader after its `get` until `parties` reads
/// have happened, so that many read-modify-write cycles overlap.
pub struct BarrierStore {
    pub inner: Arc<MemoryStore>,
    barrier: Barrier,
}

impl BarrierStore {
    pub fn new(inner: Arc<MemoryStore>, parties: usize) -> Self {
        Self {
            inner,
            barrier: Barrier::new(parties),
        }
    }
}

#[async_trait]
impl TimelineStore for BarrierStore {
    async fn get(&self, namespace: &str, key: &str) -> StoreResult<Siblings> {
        let siblings = self.inner.get(namespace, key).await?;
        self.barrier.wait().await;
        Ok(siblings)
    }

    async fn put(
        &self,
        namespace: &str,
        key: &str,
        value: Vec<u8>,
        context: Option<VersionToken>,
    ) -> StoreResult<()> {
        self.inner.put(namespace, key, value, context).await
    }
}
