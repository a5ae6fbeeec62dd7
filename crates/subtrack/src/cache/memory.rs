//! In-memory cache implementation with LRU eviction.
//!
//! Provides a thread-safe cache with TTL support using tokio synchronization
//! primitives and an LRU eviction policy. `scan` walks a sorted snapshot of
//! the live keys so a full iteration visits every key present when it started
//! and not removed meanwhile, like Redis `SCAN`.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;

use subtrack_core::cache::{pattern_matches, Cache, Result, ScanPage};

/// Page size used when `scan` is called without a count hint.
const DEFAULT_SCAN_COUNT: usize = 10;

/// A single cache entry with its expiration.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-memory cache implementation with LRU eviction.
///
/// Thread-safe cache using `Arc<RwLock<LruCache>>` for concurrent access.
/// Supports TTL with lazy expiration (entries are cleaned up on access).
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
}

impl MemoryCache {
    /// Creates a new in-memory cache with LRU eviction.
    ///
    /// # Panics
    ///
    /// Panics if `max_entries` is 0.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).expect("max_entries must be > 0");
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    /// Number of stored entries, including expired ones not yet cleaned up.
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut store = self.store.write().await;

        let expired = match store.get(key) {
            Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            store.pop(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut store = self.store.write().await;
        store.put(key.to_string(), CacheEntry::new(value.to_string(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut store = self.store.write().await;
        store.pop(key);
        Ok(())
    }

    async fn scan(&self, cursor: u64, pattern: &str, count: Option<usize>) -> Result<ScanPage> {
        let count = count.unwrap_or(DEFAULT_SCAN_COUNT).max(1);

        let mut keys: Vec<String> = {
            let store = self.store.read().await;
            store
                .iter()
                .filter(|(_, entry)| !entry.is_expired())
                .map(|(key, _)| key.clone())
                .collect()
        };
        keys.sort_unstable();

        let start = usize::try_from(cursor).unwrap_or(usize::MAX).min(keys.len());
        let end = start.saturating_add(count).min(keys.len());
        let next = if end >= keys.len() { 0 } else { end as u64 };

        let page = keys[start..end]
            .iter()
            .filter(|key| pattern_matches(pattern, key))
            .cloned()
            .collect();

        Ok(ScanPage::new(next, page))
    }
}
