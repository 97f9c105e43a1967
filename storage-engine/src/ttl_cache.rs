use async_trait::async_trait;
use dashmap::DashMap;
use receipts::ports::ResultCache;
use receipts::{Points, ReceiptId};
use shared::{Error, Result, TtlMs};
use std::sync::{Arc, Weak};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Clone, Copy, Debug)]
struct CacheEntry {
    points: Points,
    // None = never expires
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(at) if now >= at)
    }
}

/// DashMap-backed result cache with per-entry TTL.
///
/// Expiry is enforced twice: `load` treats an expired entry as missing and
/// evicts it, and every expiring `set` spawns a timer that removes the entry
/// when its deadline passes. A timer only removes what is expired at the
/// moment it fires, so an entry overwritten with a later deadline survives
/// the older timer.
#[derive(Default)]
pub struct TtlCache {
    entries: Arc<DashMap<ReceiptId, CacheEntry>>,
}

impl TtlCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held, expired-but-unswept included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn schedule_expiry(&self, key: ReceiptId, deadline: Instant) {
        let entries: Weak<DashMap<ReceiptId, CacheEntry>> = Arc::downgrade(&self.entries);

        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;

            let Some(entries) = entries.upgrade() else {
                return;
            };
            let now = Instant::now();
            if entries.remove_if(&key, |_, entry| entry.is_expired(now)).is_some() {
                debug!("Cache entry expired: key={}", key);
            }
        });
    }
}

#[async_trait]
impl ResultCache for TtlCache {
    async fn load(&self, ctx: &CancellationToken, key: &str) -> Result<Option<Points>> {
        if ctx.is_cancelled() {
            return Err(Error::Cancelled);
        }

        // Copy out so the shard lock is released before any removal
        let entry = self.entries.get(key).map(|entry| *entry.value());
        let now = Instant::now();

        match entry {
            Some(entry) if !entry.is_expired(now) => Ok(Some(entry.points)),
            Some(_) => {
                // A concurrent set may have replaced it with a live entry
                self.entries.remove_if(key, |_, entry| entry.is_expired(now));
                Ok(None)
            }
            None => Ok(None),
        }
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

        let expires_at = ttl
            .and_then(|ttl| ttl.as_duration())
            .map(|ttl| Instant::now() + ttl);

        self.entries
            .insert(key.clone(), CacheEntry { points, expires_at });

        if let Some(deadline) = expires_at {
            self.schedule_expiry(key.clone(), deadline);
        }

        debug!("Cache set: key={}, points={}", key, points);
        Ok(())
    }
}

impl std::fmt::Debug for TtlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("entry_count", &self.entries.len())
            .finish()
    }
}
