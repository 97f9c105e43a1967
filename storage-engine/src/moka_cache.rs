use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use receipts::ports::ResultCache;
use receipts::{Points, ReceiptId};
use shared::{Error, Result, TtlMs};
use std::fmt::Debug;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Clone, Debug)]
struct CachedPoints {
    points: Points,
    ttl: Option<Duration>,
}

/// Each entry carries its own ttl; an update replaces the previous deadline
struct PerEntryTtl;

impl Expiry<ReceiptId, CachedPoints> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &ReceiptId,
        value: &CachedPoints,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_update(
        &self,
        _key: &ReceiptId,
        value: &CachedPoints,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl
    }
}

/// Moka-based result cache with per-entry TTL.
/// Lock-free concurrent reads and writes, optional size bound.
#[derive(Clone)]
pub struct MokaCache {
    cache: Cache<ReceiptId, CachedPoints>,
}

impl MokaCache {
    /// Create a Moka cache with a name and optional max entries
    pub fn new(name: String, max_entries: Option<u64>) -> Self {
        let mut builder = Cache::builder().name(&name).expire_after(PerEntryTtl);

        if let Some(capacity) = max_entries {
            builder = builder.max_capacity(capacity);
        }

        Self {
            cache: builder.build(),
        }
    }

    pub fn new_unbounded() -> Self {
        Self::new("receipt-points".to_string(), None)
    }

    /// Moka drops expired entries during housekeeping, which normally only
    /// runs alongside reads and writes. This task runs it on a fixed interval
    /// so entries that are never touched again are still reclaimed.
    pub fn start_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let cache = self.cache.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                cache.run_pending_tasks().await;
            }
        })
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl ResultCache for MokaCache {
    async fn load(&self, ctx: &CancellationToken, key: &str) -> Result<Option<Points>> {
        if ctx.is_cancelled() {
            return Err(Error::Cancelled);
        }

        // Expired entries are never returned
        Ok(self.cache.get(key).await.map(|cached| cached.points))
    }

    async fn set(
        &self,
        ctx: &CancellationToken,
        key: ReceiptId,
        points: Points,
        ttl: Option<TtlMs>,
    ) -> Result<()> {
        if ctx.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let ttl = ttl.and_then(|ttl| ttl.as_duration());
        self.cache
            .insert(key.clone(), CachedPoints { points, ttl })
            .await;

        debug!("Cache set: key={}, points={}", key, points);
        Ok(())
    }
}

impl Debug for MokaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCache")
            .field("entry_count", &self.cache.entry_count())
            .field("weighted_size", &self.cache.weighted_size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn ctx() -> CancellationToken {
        CancellationToken::new()
    }

    #[tokio::test]
    async fn test_moka_cache_set_and_load() {
        let cache = MokaCache::new_unbounded();

        cache.set(&ctx(), "hello".into(), 28, None).await.unwrap();

        assert_eq!(cache.load(&ctx(), "hello").await.unwrap(), Some(28));
    }

    #[tokio::test]
    async fn test_moka_cache_load_nonexistent() {
        let cache = MokaCache::new_unbounded();

        assert_eq!(cache.load(&ctx(), "nonexistent").await, Ok(None));
    }

    #[tokio::test]
    async fn test_moka_cache_overwrite() {
        let cache = MokaCache::new_unbounded();

        cache.set(&ctx(), "key".into(), 1, None).await.unwrap();
        cache.set(&ctx(), "key".into(), 2, None).await.unwrap();

        assert_eq!(cache.load(&ctx(), "key").await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_moka_cache_with_per_entry_ttl() {
        let cache = MokaCache::new_unbounded();

        cache
            .set(&ctx(), "short".into(), 1, Some(TtlMs(100)))
            .await
            .unwrap();
        cache
            .set(&ctx(), "long".into(), 2, Some(TtlMs(60_000)))
            .await
            .unwrap();

        assert_eq!(cache.load(&ctx(), "short").await.unwrap(), Some(1));

        // Wait for expiration
        sleep(Duration::from_millis(200)).await;

        assert_eq!(cache.load(&ctx(), "short").await.unwrap(), None);
        assert_eq!(cache.load(&ctx(), "long").await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_moka_cache_overwrite_replaces_expiry() {
        let cache = MokaCache::new_unbounded();

        cache
            .set(&ctx(), "key".into(), 1, Some(TtlMs(100)))
            .await
            .unwrap();
        cache.set(&ctx(), "key".into(), 2, Some(TtlMs(0))).await.unwrap();

        sleep(Duration::from_millis(200)).await;

        assert_eq!(cache.load(&ctx(), "key").await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_moka_cache_sweeper_reclaims_unread_entries() {
        let cache = MokaCache::new_unbounded();
        let sweeper = cache.start_sweeper(Duration::from_millis(50));

        cache
            .set(&ctx(), "never_read".into(), 1, Some(TtlMs(100)))
            .await
            .unwrap();

        sleep(Duration::from_millis(400)).await;

        assert_eq!(cache.entry_count(), 0);
        sweeper.abort();
    }

    #[tokio::test]
    async fn test_moka_cache_respects_cancellation() {
        let cache = MokaCache::new_unbounded();
        let cancelled = CancellationToken::new();
        cancelled.cancel();

        assert_eq!(
            cache.set(&cancelled, "key".into(), 1, None).await,
            Err(Error::Cancelled)
        );
        assert_eq!(cache.load(&cancelled, "key").await, Err(Error::Cancelled));
    }
}
