//! In-memory rejection counters.
//!
//! Each guard instance owns one counter set, constructed eagerly at
//! bootstrap — there is no lazily-initialized lock to race on. Consulted by
//! operational tooling; nothing in the request path ever reads them.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Eager per-path / per-method rejection counters.
#[derive(Debug, Default)]
pub struct RejectionCounters {
    total: AtomicU64,
    per_path: DashMap<String, u64>,
    per_method: DashMap<String, u64>,
}

impl RejectionCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one rejection. The increment holds the map's shard lock only
    /// for the bump itself.
    pub fn record(&self, path: &str, method: Option<&str>) {
        self.total.fetch_add(1, Ordering::Relaxed);
        *self.per_path.entry(path.to_string()).or_insert(0) += 1;
        if let Some(method) = method {
            *self.per_method.entry(method.to_string()).or_insert(0) += 1;
        }
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn for_path(&self, path: &str) -> u64 {
        self.per_path.get(path).map(|c| *c).unwrap_or(0)
    }

    pub fn for_method(&self, method: &str) -> u64 {
        self.per_method.get(method).map(|c| *c).unwrap_or(0)
    }
}
