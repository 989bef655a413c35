//! Request cache implementation

use crate::error::{Error, Result};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// Result handed to every caller waiting on a key
///
/// Both sides are reference counted so one fetch outcome can be shared by
/// all deduplicated waiters without cloning the payload.
pub type SharedResult<V> = std::result::Result<Arc<V>, Arc<Error>>;

type InFlight<V> = Shared<BoxFuture<'static, SharedResult<V>>>;

/// Configuration for the request cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long a stored result counts as fresh. `None` never expires.
    pub ttl: Option<Duration>,
}

impl CacheConfig {
    /// Cache that never expires entries
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache whose entries expire after `ttl`
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl: Some(ttl) }
    }
}

#[derive(Debug)]
struct CacheEntry<V> {
    value: Arc<V>,
    fetched_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, ttl: Option<Duration>) -> bool {
        match ttl {
            Some(ttl) => self.fetched_at.elapsed() < ttl,
            None => true,
        }
    }
}

struct Inner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    in_flight: HashMap<String, InFlight<V>>,
}

/// Keyed, deduplicating cache of fetch results
///
/// Cloning is cheap and clones share the same storage.
pub struct RequestCache<V> {
    inner: Arc<Mutex<Inner<V>>>,
    config: CacheConfig,
}

impl<V> Clone for RequestCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            config: self.config,
        }
    }
}

impl<V> Default for RequestCache<V> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl<V> std::fmt::Debug for RequestCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestCache")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<V> RequestCache<V> {
    /// Create an empty cache
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                entries: HashMap::new(),
                in_flight: HashMap::new(),
            })),
            config,
        }
    }

    /// Cache configuration
    pub fn config(&self) -> CacheConfig {
        self.config
    }

    /// Cached value for a key, fresh or not
    pub async fn peek(&self, key: &str) -> Option<Arc<V>> {
        let inner = self.inner.lock().await;
        inner.entries.get(key).map(|e| Arc::clone(&e.value))
    }

    /// Whether a fresh value is cached for a key
    pub async fn is_fresh(&self, key: &str) -> bool {
        let inner = self.inner.lock().await;
        inner
            .entries
            .get(key)
            .is_some_and(|e| e.is_fresh(self.config.ttl))
    }

    /// Drop the cached value for a key so the next lookup refetches
    pub async fn invalidate(&self, key: &str) -> bool {
        let mut inner = self.inner.lock().await;
        let removed = inner.entries.remove(key).is_some();
        if removed {
            debug!("Invalidated cache entry: {}", key);
        }
        removed
    }

    /// Drop every cached value
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.entries.clear();
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    /// Whether the cache holds no entries
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.entries.is_empty()
    }
}

impl<V: Send + Sync + 'static> RequestCache<V> {
    /// Return the value for `key`, fetching it if needed
    ///
    /// A fresh entry is returned without calling `fetch`. If a fetch for the
    /// same key is already running the caller joins it. Otherwise `fetch` is
    /// invoked once and its outcome is shared with every concurrent waiter.
    /// Only successful results are stored. Storing one evicts every expired
    /// entry.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> SharedResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let pending = {
            let mut inner = self.inner.lock().await;

            if let Some(entry) = inner.entries.get(key) {
                if entry.is_fresh(self.config.ttl) {
                    debug!("Cache hit: {}", key);
                    return Ok(Arc::clone(&entry.value));
                }
            }

            if let Some(pending) = inner.in_flight.get(key) {
                debug!("Joining in-flight request: {}", key);
                pending.clone()
            } else {
                debug!("Cache miss, fetching: {}", key);
                let pending = fetch()
                    .map(|result| result.map(Arc::new).map_err(Arc::new))
                    .boxed()
                    .shared();
                inner.in_flight.insert(key.to_string(), pending.clone());
                pending
            }
        };

        let result = pending.clone().await;

        let mut inner = self.inner.lock().await;
        if inner
            .in_flight
            .get(key)
            .is_some_and(|current| current.ptr_eq(&pending))
        {
            inner.in_flight.remove(key);
            if let Ok(value) = &result {
                let ttl = self.config.ttl;
                if ttl.is_some() {
                    let before = inner.entries.len();
                    inner.entries.retain(|_, entry| entry.is_fresh(ttl));
                    let evicted = before - inner.entries.len();
                    if evicted > 0 {
                        debug!("Evicted {} expired entries", evicted);
                    }
                }
                inner.entries.insert(
                    key.to_string(),
                    CacheEntry {
                        value: Arc::clone(value),
                        fetched_at: Instant::now(),
                    },
                );
            }
        }

        result
    }
}
