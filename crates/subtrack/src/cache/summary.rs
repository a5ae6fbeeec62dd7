//! Cache-aside storage of summary totals.
//!
//! Reads go cache first; on a miss the caller's compute step runs and its
//! result is written back with the configured TTL. Cache failures never
//! reach the caller: they are logged and treated as a miss.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace, warn};

use subtrack_core::cache::{decode_total, encode_total, summary_key, summary_pattern, Cache};

use crate::service::CallContext;

/// Keys requested per `SCAN` page during invalidation.
const SCAN_BATCH: usize = 100;

#[derive(Clone)]
pub struct SummaryCache {
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl SummaryCache {
    pub fn new(cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Returns the cached total for the query or computes and stores it.
    ///
    /// `from` and `to` are the raw request bounds; they only shape the key.
    /// Errors from `compute` are returned untouched and nothing is cached.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        ctx: &CallContext,
        user_id: &str,
        service_name: &str,
        from: &str,
        to: &str,
        compute: F,
    ) -> Result<i64, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<i64, E>>,
    {
        let key = summary_key(user_id, service_name, from, to);

        match ctx.run(self.cache.get(&key)).await {
            Ok(Ok(Some(value))) => match decode_total(&value) {
                Ok(total) => {
                    trace!(key = %key, "Summary cache hit");
                    return Ok(total);
                }
                Err(e) => warn!(key = %key, error = %e, "Discarding unreadable summary cache entry"),
            },
            Ok(Ok(None)) => trace!(key = %key, "Summary cache miss"),
            Ok(Err(e)) => warn!(key = %key, error = %e, "Summary cache read failed"),
            Err(e) => warn!(key = %key, error = %e, "Summary cache read interrupted"),
        }

        let total = compute().await?;

        match ctx
            .run(self.cache.set(&key, &encode_total(total), self.ttl))
            .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(key = %key, error = %e, "Failed to cache summary"),
            Err(e) => warn!(key = %key, error = %e, "Summary cache write interrupted"),
        }

        Ok(total)
    }

    /// Removes every cached summary of `user_id`.
    ///
    /// Returns the number of keys deleted. Failures are logged; a failed or
    /// interrupted scan ends the pass early.
    pub async fn invalidate(&self, ctx: &CallContext, user_id: &str) -> usize {
        let pattern = summary_pattern(user_id);

        let mut keys = Vec::new();
        let mut cursor = 0;
        loop {
            match ctx
                .run(self.cache.scan(cursor, &pattern, Some(SCAN_BATCH)))
                .await
            {
                Ok(Ok(page)) => {
                    keys.extend(page.keys);
                    if page.cursor == 0 {
                        break;
                    }
                    cursor = page.cursor;
                }
                Ok(Err(e)) => {
                    warn!(user_id = %user_id, error = %e, "Summary cache scan failed");
                    break;
                }
                Err(e) => {
                    warn!(user_id = %user_id, error = %e, "Summary cache scan interrupted");
                    break;
                }
            }
        }

        let mut deleted = 0;
        for key in &keys {
            match ctx.run(self.cache.delete(key)).await {
                Ok(Ok(())) => deleted += 1,
                Ok(Err(e)) => warn!(key = %key, error = %e, "Failed to delete summary cache entry"),
                Err(e) => {
                    warn!(key = %key, error = %e, "Summary cache invalidation interrupted");
                    break;
                }
            }
        }

        debug!(user_id = %user_id, deleted, "Invalidated summary cache");
        deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use subtrack_core::cache::{CacheError, Result as CacheResult, ScanPage};

    use crate::cache::MemoryCache;

    const TTL: Duration = Duration::from_secs(600);

    fn setup() -> (Arc<MemoryCache>, SummaryCache) {
        let memory = Arc::new(MemoryCache::new(1000));
        let summaries = SummaryCache::new(memory.clone(), TTL);
        (memory, summaries)
    }

    /// Cache double whose operations fail on demand.
    struct FaultyCache {
        inner: MemoryCache,
        fail_get: bool,
        fail_set: bool,
        fail_scan: bool,
        fail_delete_of: Option<String>,
    }

    impl FaultyCache {
        fn new() -> Self {
            Self {
                inner: MemoryCache::new(1000),
                fail_get: false,
                fail_set: false,
                fail_scan: false,
                fail_delete_of: None,
            }
        }

        fn boom() -> CacheError {
            CacheError::ConnectionFailed("connection refused".to_string())
        }
    }

    #[async_trait]
    impl Cache for FaultyCache {
        async fn get(&self, key: &str) -> CacheResult<Option<String>> {
            if self.fail_get {
                return Err(Self::boom());
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
            if self.fail_set {
                return Err(Self::boom());
            }
            self.inner.set(key, value, ttl).await
        }

        async fn delete(&self, key: &str) -> CacheResult<()> {
            if self.fail_delete_of.as_deref() == Some(key) {
                return Err(Self::boom());
            }
            self.inner.delete(key).await
        }

        async fn scan(
            &self,
            cursor: u64,
            pattern: &str,
            count: Option<usize>,
        ) -> CacheResult<ScanPage> {
            if self.fail_scan {
                return Err(Self::boom());
            }
            self.inner.scan(cursor, pattern, count).await
        }
    }

    async fn compute_counted(calls: &AtomicUsize, total: i64) -> std::result::Result<i64, String> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(total)
    }

    #[tokio::test]
    async fn test_miss_computes_and_populates() {
        let (memory, summaries) = setup();
        let ctx = CallContext::background();
        let calls = AtomicUsize::new(0);

        let total = summaries
            .get_or_compute(&ctx, "u1", "", "", "", || compute_counted(&calls, 1299))
            .await
            .unwrap();

        assert_eq!(total, 1299);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            memory.get("summary:u1::-").await.unwrap().as_deref(),
            Some("1299")
        );
    }

    #[tokio::test]
    async fn test_hit_skips_compute() {
        let (_memory, summaries) = setup();
        let ctx = CallContext::background();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let total = summaries
                .get_or_compute(&ctx, "u1", "Netflix", "01-2025", "12-2025", || {
                    compute_counted(&calls, 500)
                })
                .await
                .unwrap();
            assert_eq!(total, 500);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_raw_range_text_shapes_the_key() {
        let (_memory, summaries) = setup();
        let ctx = CallContext::background();
        let calls = AtomicUsize::new(0);

        summaries
            .get_or_compute(&ctx, "u1", "", "", "", || compute_counted(&calls, 1))
            .await
            .unwrap();
        summaries
            .get_or_compute(&ctx, "u1", "", "01-0001", "", || compute_counted(&calls, 1))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_compute_error_is_not_cached() {
        let (memory, summaries) = setup();
        let ctx = CallContext::background();

        let result: std::result::Result<i64, String> = summaries
            .get_or_compute(&ctx, "u1", "", "", "", || async {
                Err("storage down".to_string())
            })
            .await;

        assert_eq!(result, Err("storage down".to_string()));
        assert_eq!(memory.get("summary:u1::-").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unreadable_entry_is_a_miss() {
        let (memory, summaries) = setup();
        let ctx = CallContext::background();
        let calls = AtomicUsize::new(0);
        memory.set("summary:u1::-", "garbage", TTL).await.unwrap();

        let total = summaries
            .get_or_compute(&ctx, "u1", "", "", "", || compute_counted(&calls, 7))
            .await
            .unwrap();

        assert_eq!(total, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            memory.get("summary:u1::-").await.unwrap().as_deref(),
            Some("7")
        );
    }

    #[tokio::test]
    async fn test_cache_failures_degrade_to_compute() {
        let mut faulty = FaultyCache::new();
        faulty.fail_get = true;
        faulty.fail_set = true;
        let summaries = SummaryCache::new(Arc::new(faulty), TTL);
        let ctx = CallContext::background();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let total = summaries
                .get_or_compute(&ctx, "u1", "", "", "", || compute_counted(&calls, 3))
                .await
                .unwrap();
            assert_eq!(total, 3);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_removes_only_that_user() {
        let (memory, summaries) = setup();
        let ctx = CallContext::background();

        for i in 0..250 {
            memory
                .set(&summary_key("u1", &format!("s{i}"), "", ""), "1", TTL)
                .await
                .unwrap();
        }
        memory.set(&summary_key("u2", "", "", ""), "1", TTL).await.unwrap();
        memory.set(&summary_key("u10", "", "", ""), "1", TTL).await.unwrap();

        assert_eq!(summaries.invalidate(&ctx, "u1").await, 250);

        assert_eq!(memory.len().await, 2);
        assert!(memory.get(&summary_key("u2", "", "", "")).await.unwrap().is_some());
        assert!(memory.get(&summary_key("u10", "", "", "")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_invalidate_escapes_glob_user_ids() {
        let (memory, summaries) = setup();
        let ctx = CallContext::background();
        memory.set(&summary_key("a*", "", "", ""), "1", TTL).await.unwrap();
        memory.set(&summary_key("ab", "", "", ""), "1", TTL).await.unwrap();

        assert_eq!(summaries.invalidate(&ctx, "a*").await, 1);
        assert!(memory.get(&summary_key("ab", "", "", "")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_invalidate_continues_past_delete_failure() {
        let mut faulty = FaultyCache::new();
        let broken = summary_key("u1", "a", "", "");
        faulty.fail_delete_of = Some(broken.clone());
        for service in ["a", "b", "c"] {
            faulty
                .inner
                .set(&summary_key("u1", service, "", ""), "1", TTL)
                .await
                .unwrap();
        }
        let faulty = Arc::new(faulty);
        let summaries = SummaryCache::new(faulty.clone(), TTL);

        let deleted = summaries.invalidate(&CallContext::background(), "u1").await;

        assert_eq!(deleted, 2);
        assert!(faulty.inner.get(&broken).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_invalidate_scan_failure_is_swallowed() {
        let mut faulty = FaultyCache::new();
        faulty.fail_scan = true;
        let summaries = SummaryCache::new(Arc::new(faulty), TTL);

        assert_eq!(summaries.invalidate(&CallContext::background(), "u1").await, 0);
    }

    #[tokio::test]
    async fn test_invalidate_with_cancelled_context() {
        let (memory, summaries) = setup();
        memory.set(&summary_key("u1", "", "", ""), "1", TTL).await.unwrap();
        let ctx = CallContext::background();
        ctx.cancel();

        assert_eq!(summaries.invalidate(&ctx, "u1").await, 0);
        assert_eq!(memory.len().await, 1);
    }
}
