//! In-memory sibling-producing store.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::siblings::{Siblings, Version, VersionToken};
use crate::TimelineStore;

type Key = (String, String);

#[derive(Debug, Default)]
struct Inner {
    next_seq: u64,
    keys: HashMap<Key, Vec<(u64, Vec<u8>)>>,
}

/// A [`TimelineStore`] kept in process memory.
///
/// Behaves like a multi-version store with siblings enabled. Every write
/// is stored under a fresh sequence number. A read returns all live
/// versions, each tagged with a token naming every sequence number the
/// reader observed. A write removes exactly the versions its token names and
/// adds itself; versions written after the token was issued survive as
/// siblings, as does everything when no token is given.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live versions under `key`.
    pub async fn sibling_count(&self, namespace: &str, key: &str) -> usize {
        let inner = self.inner.lock().await;
        inner
            .keys
            .get(&(namespace.to_string(), key.to_string()))
            .map_or(0, Vec::len)
    }

    /// Returns all keys holding data in `namespace`, sorted.
    pub async fn keys(&self, namespace: &str) -> Vec<String> {
        let inner = self.inner.lock().await;
        let mut keys: Vec<String> = inner
            .keys
            .iter()
            .filter(|((ns, _), versions)| ns == namespace && !versions.is_empty())
            .map(|((_, key), _)| key.clone())
            .collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl TimelineStore for MemoryStore {
    async fn get(&self, namespace: &str, key: &str) -> StoreResult<Siblings> {
        let inner = self.inner.lock().await;
        let Some(stored) = inner.keys.get(&(namespace.to_string(), key.to_string())) else {
            return Ok(Siblings::Empty);
        };

        let token = encode_token(stored.iter().map(|(seq, _)| *seq));
        let versions = stored
            .iter()
            .map(|(_, value)| Version::new(value.clone(), token.clone()))
            .collect();
        Ok(Siblings::from_versions(versions))
    }

    async fn put(
        &self,
        namespace: &str,
        key: &str,
        value: Vec<u8>,
        context: Option<VersionToken>,
    ) -> StoreResult<()> {
        let observed = match &context {
            Some(token) => decode_token(token)?,
            None => HashSet::new(),
        };

        let mut inner = self.inner.lock().await;
        inner.next_seq += 1;
        let seq = inner.next_seq;

        let stored = inner
            .keys
            .entry((namespace.to_string(), key.to_string()))
            .or_default();
        stored.retain(|(s, _)| !observed.contains(s));
        stored.push((seq, value));

        debug!(namespace, key, seq, siblings = stored.len(), "memory store put");
        Ok(())
    }
}

fn encode_token(seqs: impl Iterator<Item = u64>) -> VersionToken {
    VersionToken::from_bytes(seqs.flat_map(u64::to_be_bytes).collect())
}

fn decode_token(token: &VersionToken) -> StoreResult<HashSet<u64>> {
    let bytes = token.as_bytes();
    if bytes.len() % 8 != 0 {
        return Err(StoreError::InvalidToken(format!(
            "expected a multiple of 8 bytes, got {}",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(8)
        .map(|chunk| {
            let mut seq = [0u8; 8];
            seq.copy_from_slice(chunk);
            u64::from_be_bytes(seq)
        })
        .collect())
}
