use async_trait::async_trait;
use receipts::ports::PointsStore;
use receipts::{Points, ReceiptId};
use shared::{Error, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// In-memory primary store. Scores live for the lifetime of the process.
///
/// Many concurrent readers, one writer at a time. Waiting for the lock is
/// abandoned as soon as the caller's token is cancelled.
#[derive(Default)]
pub struct InMemoryPointsStore {
    data: RwLock<HashMap<ReceiptId, Points>>,
}

impl InMemoryPointsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

#[async_trait]
impl PointsStore for InMemoryPointsStore {
    async fn store(&self, ctx: &CancellationToken, points: Points) -> Result<ReceiptId> {
        if ctx.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let mut data = tokio::select! {
            biased;
            _ = ctx.cancelled() => return Err(Error::Cancelled),
            guard = self.data.write() => guard,
        };

        // v4 collisions are not expected, but an identifier is never reused
        let id = loop {
            let candidate = Uuid::new_v4().to_string();
            if !data.contains_key(&candidate) {
                break candidate;
            }
        };

        data.insert(id.clone(), points);
        Ok(id)
    }

    async fn retrieve(&self, ctx: &CancellationToken, id: &str) -> Result<Option<Points>> {
        if ctx.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let data = tokio::select! {
            biased;
            _ = ctx.cancelled() => return Err(Error::Cancelled),
            guard = self.data.read() => guard,
        };

        Ok(data.get(id).copied())
    }
}

impl std::fmt::Debug for InMemoryPointsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryPointsStore")
            .field("data", &"<RwLock<HashMap>>")
            .finish()
    }
}
