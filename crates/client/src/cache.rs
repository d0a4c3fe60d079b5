//! Staleness-aware response cache with request deduplication.
//!
//! Values are stored as JSON alongside the instant they were fetched. A
//! read served within the staleness window never touches the network; a
//! stale or missing entry triggers one fetch even when many readers ask
//! concurrently, because all of them await the same in-flight cell.
//!
//! Failures are never cached: a failed fetch leaves the cell empty and
//! later readers fetch anew. A fetch that completes after its key was
//! invalidated discards its result instead of resurrecting the entry.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{Mutex, OnceCell};
use tokio::time::Instant;

use crate::error::StoreError;
use crate::keys::QueryKey;

struct CachedValue {
    value: serde_json::Value,
    stored_at: Instant,
}

type PendingCell = Arc<OnceCell<serde_json::Value>>;

#[derive(Default)]
struct CacheInner {
    entries: HashMap<QueryKey, CachedValue>,
    pending: HashMap<QueryKey, PendingCell>,
}

/// Keyed cache of task store responses.
#[derive(Default)]
pub struct QueryCache {
    inner: Mutex<CacheInner>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read through the cache.
    ///
    /// Returns the cached value when one exists and is younger than
    /// `stale_after`; otherwise runs `fetch` and caches its result.
    /// Passing `Duration::ZERO` makes every read fetch. Concurrent
    /// readers of the same stale key share a single fetch.
    pub async fn get_with<T, F, Fut>(
        &self,
        key: &QueryKey,
        stale_after: Duration,
        fetch: F,
    ) -> Result<T, StoreError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let cell = {
            let mut inner = self.inner.lock().await;
            if let Some(entry) = inner.entries.get(key) {
                if entry.stored_at.elapsed() < stale_after {
                    tracing::debug!(key = %key, "Cache hit");
                    return Ok(serde_json::from_value(entry.value.clone())?);
                }
            }
            inner
                .pending
                .entry(key.clone())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        let result = cell
            .get_or_try_init(|| async {
                tracing::debug!(key = %key, "Cache miss, fetching");
                let fetched = fetch().await?;
                serde_json::to_value(fetched).map_err(StoreError::from)
            })
            .await;

        match result {
            Ok(value) => {
                let value = value.clone();
                let mut inner = self.inner.lock().await;
                // Write back only while our cell is still the registered
                // in-flight fetch for this key. Invalidation clears the
                // slot, which turns a late-arriving result into a no-op.
                if inner
                    .pending
                    .get(key)
                    .is_some_and(|current| Arc::ptr_eq(current, &cell))
                {
                    inner.entries.insert(
                        key.clone(),
                        CachedValue {
                            value: value.clone(),
                            stored_at: Instant::now(),
                        },
                    );
                    inner.pending.remove(key);
                }
                Ok(serde_json::from_value(value)?)
            }
            Err(e) => {
                let mut inner = self.inner.lock().await;
                if inner
                    .pending
                    .get(key)
                    .is_some_and(|current| Arc::ptr_eq(current, &cell))
                {
                    inner.pending.remove(key);
                }
                Err(e)
            }
        }
    }

    /// Drop the entry stored under exactly `key`, along with any fetch
    /// still in flight for it.
    pub async fn invalidate(&self, key: &QueryKey) {
        let mut inner = self.inner.lock().await;
        inner.entries.remove(key);
        inner.pending.remove(key);
        tracing::debug!(key = %key, "Cache invalidated");
    }

    /// Drop every entry whose key starts with `prefix`, along with any
    /// fetches still in flight for them.
    pub async fn invalidate_prefix(&self, prefix: &QueryKey) {
        let mut inner = self.inner.lock().await;
        inner.entries.retain(|key, _| !key.starts_with(prefix));
        inner.pending.retain(|key, _| !key.starts_with(prefix));
        tracing::debug!(prefix = %prefix, "Cache prefix invalidated");
    }

    /// Number of stored entries, stale ones included.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.entries.is_empty()
    }
}
