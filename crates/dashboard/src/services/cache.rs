//! Path-keyed cache for rendered dashboard payloads.
//!
//! Keys are request paths, not content hashes, so a mutation knows exactly
//! which entries to drop. Entries also carry a short TTL as a backstop for
//! writes that bypass the dashboard entirely (the analytics pipeline, the
//! consumer app).

use std::time::Duration;

use moka::future::Cache;
use serde_json::Value;

/// Maximum number of cached payloads.
const MAX_ENTRIES: u64 = 1_024;

/// Backstop TTL for entries whose underlying data changes outside the
/// dashboard.
const ENTRY_TTL: Duration = Duration::from_secs(60);

/// Async cache of rendered JSON payloads keyed by request path.
#[derive(Clone)]
pub struct PageCache {
    inner: Cache<String, Value>,
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PageCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(MAX_ENTRIES)
                .time_to_live(ENTRY_TTL)
                .support_invalidation_closures()
                .build(),
        }
    }

    /// Cached payload for a path, if fresh.
    pub async fn get(&self, path: &str) -> Option<Value> {
        self.inner.get(path).await
    }

    /// Store a rendered payload under its request path.
    pub async fn insert(&self, path: &str, payload: Value) {
        self.inner.insert(path.to_owned(), payload).await;
    }

    /// Drop one path.
    pub async fn invalidate(&self, path: &str) {
        self.inner.invalidate(path).await;
    }

    /// Drop every cached path under a prefix (e.g. all views of one venue
    /// after a write to it).
    pub fn invalidate_prefix(&self, prefix: &str) {
        let prefix = prefix.to_owned();
        // Closure-based invalidation is lazy; stale entries stop being
        // served immediately.
        let _ = self
            .inner
            .invalidate_entries_if(move |key, _| key.starts_with(&prefix));
    }
}
