//! In-process store backend.
//!
//! Entries carry an absolute deadline; expiry is enforced lazily on access
//! plus an opportunistic sweep every [`PURGE_INTERVAL_OPS`] operations so a
//! write-mostly workload cannot grow the map unboundedly.

use crate::error::KvResult;
use crate::store::KvStore;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Sweep the whole map for dead entries once per this many operations.
const PURGE_INTERVAL_OPS: u64 = 256;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    deadline: Instant,
}

impl Entry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

/// In-memory [`KvStore`] backend.
///
/// Single-key atomicity comes from the map's per-shard locking; that is the
/// same guarantee the production backend gives, which keeps test behavior
/// honest.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: DashMap<String, Entry>,
    ops: AtomicU64,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries. Test/diagnostic helper.
    pub fn live_len(&self) -> usize {
        self.entries.iter().filter(|e| !e.value().is_expired()).count()
    }

    fn tick(&self) {
        let ops = self.ops.fetch_add(1, Ordering::Relaxed);
        if ops % PURGE_INTERVAL_OPS == PURGE_INTERVAL_OPS - 1 {
            let now = Instant::now();
            self.entries.retain(|_, entry| entry.deadline > now);
        }
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> KvResult<()> {
        self.tick();
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                deadline: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        self.tick();
        // The map guard must be released before remove_if touches the same key.
        let live = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => Some(entry.value.clone()),
            Some(_) => None,
            None => return Ok(None),
        };
        if live.is_none() {
            self.entries.remove_if(key, |_, entry| entry.is_expired());
        }
        Ok(live)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> KvResult<bool> {
        self.tick();
        let mut refreshed = false;
        if let Some(mut entry) = self.entries.get_mut(key) {
            if !entry.is_expired() {
                entry.deadline = Instant::now() + ttl;
                refreshed = true;
            }
        }
        if !refreshed {
            self.entries.remove_if(key, |_, entry| entry.is_expired());
        }
        Ok(refreshed)
    }

    async fn delete(&self, key: &str) -> KvResult<()> {
        self.tick();
        self.entries.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> KvResult<bool> {
        self.tick();
        Ok(self
            .entries
            .get(key)
            .map(|entry| !entry.is_expired())
            .unwrap_or(false))
    }
}
