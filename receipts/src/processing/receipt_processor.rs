use crate::domain::{Points, PurchaseRecord, ReceiptId};
use crate::ports::{PointsStore, ResultCache};
use crate::processing::cache_warmer::CacheWarmer;
use crate::processing::operation::ReceiptOperations;
use crate::scoring::compute_score;
use async_trait::async_trait;
use shared::{Error, Result, TtlMs};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_WARM_QUEUE_CAPACITY: usize = 1024;

/// Application service that orchestrates scoring, persistence and caching.
///
/// Writes go to the store synchronously and to the cache through the
/// [`CacheWarmer`]. Reads are cache-aside with a store fallback.
#[derive(Clone)]
pub struct ReceiptProcessor {
    store: Arc<dyn PointsStore>,
    cache: Arc<dyn ResultCache>,
    warmer: CacheWarmer,
}

impl ReceiptProcessor {
    /// Build a processor and spawn its cache warmer on the current runtime
    pub fn new(
        store: Arc<dyn PointsStore>,
        cache: Arc<dyn ResultCache>,
        cache_ttl: Duration,
        warm_queue_capacity: usize,
    ) -> Self {
        let (warmer, _worker) = CacheWarmer::spawn(
            cache.clone(),
            Some(TtlMs::from_duration(cache_ttl)),
            warm_queue_capacity,
        );
        Self::with_warmer(store, cache, warmer)
    }

    pub fn with_defaults(store: Arc<dyn PointsStore>, cache: Arc<dyn ResultCache>) -> Self {
        Self::new(store, cache, DEFAULT_CACHE_TTL, DEFAULT_WARM_QUEUE_CAPACITY)
    }

    pub fn with_warmer(
        store: Arc<dyn PointsStore>,
        cache: Arc<dyn ResultCache>,
        warmer: CacheWarmer,
    ) -> Self {
        Self {
            store,
            cache,
            warmer,
        }
    }

    pub fn warmer(&self) -> &CacheWarmer {
        &self.warmer
    }
}

#[async_trait]
impl ReceiptOperations for ReceiptProcessor {
    async fn process_receipt(
        &self,
        ctx: &CancellationToken,
        record: &PurchaseRecord,
    ) -> Result<ReceiptId> {
        let points = compute_score(record);

        let id = self.store.store(ctx, points).await.inspect_err(|e| {
            error!("Error storing processed receipt: {}", e);
        })?;

        info!("Stored receipt '{}' with {} points", id, points);
        self.warmer.warm(id.clone(), points);

        Ok(id)
    }

    async fn get_points(&self, ctx: &CancellationToken, id: &str) -> Result<Points> {
        match self.cache.load(ctx, id).await {
            Ok(Some(points)) => {
                debug!("Cache hit for receipt '{}'", id);
                return Ok(points);
            }
            Ok(None) => debug!("Cache miss for receipt '{}'", id),
            Err(e) => warn!("Cache lookup failed for receipt '{}': {}", id, e),
        }

        match self.store.retrieve(ctx, id).await? {
            Some(points) => {
                self.warmer.warm(id.to_string(), points);
                Ok(points)
            }
            None => Err(Error::NotFound),
        }
    }
}

impl std::fmt::Debug for ReceiptProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceiptProcessor")
            .field("warmer", &self.warmer)
            .finish()
    }
}
