use crate::domain::{Points, ReceiptId};
use async_trait::async_trait;
use shared::{Result, TtlMs};
use tokio_util::sync::CancellationToken;

// Ports are the pluggable extension points for the store and cache implementations.
// Every call takes the caller's cancellation token and must check it before doing work.

/// Authoritative, write-once store of computed scores
#[async_trait]
pub trait PointsStore: Send + Sync + 'static {
    /// Persist a score under a freshly generated identifier
    async fn store(&self, ctx: &CancellationToken, points: Points) -> Result<ReceiptId>;

    /// Look up a score; `Ok(None)` when the identifier was never issued
    async fn retrieve(&self, ctx: &CancellationToken, id: &str) -> Result<Option<Points>>;
}

/// Best-effort, time-limited cache in front of a [`PointsStore`]
#[async_trait]
pub trait ResultCache: Send + Sync + 'static {
    /// `Ok(None)` for unknown or expired keys
    async fn load(&self, ctx: &CancellationToken, key: &str) -> Result<Option<Points>>;

    /// Insert or replace an entry. `None` or a zero ttl never expires.
    async fn set(
        &self,
        ctx: &CancellationToken,
        key: ReceiptId,
        points: Points,
        ttl: Option<TtlMs>,
    ) -> Result<()>;
}
