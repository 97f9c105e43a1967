pub mod memory_store;
pub mod moka_cache;
pub mod ttl_cache;

pub use memory_store::InMemoryPointsStore;
pub use moka_cache::MokaCache;
pub use ttl_cache::TtlCache;

use receipts::ports::{PointsStore, ResultCache};
use shared::config::CacheBackend;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const MOKA_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Builds store and cache adapters from configuration
pub struct UnifiedStorageFactory;

impl UnifiedStorageFactory {
    pub fn points_store() -> Arc<dyn PointsStore> {
        Arc::new(InMemoryPointsStore::new())
    }

    /// Must be called from inside a tokio runtime when `backend` is Moka
    pub fn result_cache(backend: CacheBackend) -> Arc<dyn ResultCache> {
        match backend {
            CacheBackend::Ttl => {
                info!("Using DashMap TTL result cache");
                Arc::new(TtlCache::new())
            }
            CacheBackend::Moka => {
                info!("Using Moka result cache");
                let cache = MokaCache::new_unbounded();
                cache.start_sweeper(MOKA_SWEEP_INTERVAL);
                Arc::new(cache)
            }
        }
    }
}
