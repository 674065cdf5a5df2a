//! Request-keyed read cache.
//!
//! Single-tab semantics: the cache is the only shared mutable resource,
//! last writer wins, and mutations keep it consistent through the
//! invalidation engine in [`invalidation`] rather than per-call-site
//! key lists.
//!
//! Each entry is fresh for [`FRESH_WINDOW`] after it is written and is
//! retained for [`RETENTION_WINDOW`] after its last use; entries idle
//! longer than that are evicted lazily on access.

pub mod invalidation;
pub mod keys;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::Value;

pub use invalidation::{invalidate, EntityChange, EntityKind};
pub use keys::{QueryFamily, QueryKey};

/// How long a cached read is served without refetching.
pub const FRESH_WINDOW: Duration = Duration::from_secs(5 * 60);
/// How long an inactive entry stays in memory after its last use.
pub const RETENTION_WINDOW: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    stored_at: Instant,
    last_used: Instant,
}

/// Outcome of a cache lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Inside the freshness window; serve without a request.
    Fresh(Value),
    /// Retained but past the freshness window; refetch, but the stale
    /// value is available for fallback display.
    Stale(Value),
    Miss,
}

pub struct QueryCache {
    entries: HashMap<QueryKey, CacheEntry>,
    fresh_window: Duration,
    retention_window: Duration,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::with_windows(FRESH_WINDOW, RETENTION_WINDOW)
    }

    /// Custom windows, for tests and non-default deployments.
    pub fn with_windows(fresh_window: Duration, retention_window: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            fresh_window,
            retention_window,
        }
    }

    /// Look up a key, updating its last-used time when present.
    pub fn get(&mut self, key: &QueryKey) -> Lookup {
        self.purge_expired();
        let fresh_window = self.fresh_window;
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.last_used = Instant::now();
                if entry.stored_at.elapsed() < fresh_window {
                    Lookup::Fresh(entry.value.clone())
                } else {
                    Lookup::Stale(entry.value.clone())
                }
            }
            None => Lookup::Miss,
        }
    }

    /// Store a value, resetting the freshness window. Also used as the
    /// direct cache write after a mutation returned the updated entity.
    pub fn insert(&mut self, key: QueryKey, value: Value) {
        let now = Instant::now();
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: now,
                last_used: now,
            },
        );
    }

    pub fn remove(&mut self, key: &QueryKey) {
        self.entries.remove(key);
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Evict every key matching the predicate. Returns how many were
    /// dropped.
    pub fn evict_where(&mut self, pred: impl Fn(&QueryKey) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !pred(key));
        before - self.entries.len()
    }

    /// Drop entries idle past the retention window.
    pub fn purge_expired(&mut self) {
        let retention = self.retention_window;
        self.entries
            .retain(|_, entry| entry.last_used.elapsed() < retention);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}
