use crate::domain::{Points, ReceiptId};
use crate::ports::ResultCache;
use shared::TtlMs;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

enum WarmMessage {
    Warm { id: ReceiptId, points: Points },
    Flush(oneshot::Sender<()>),
}

/// Fire-and-forget cache population.
///
/// Jobs go through a bounded queue to a single worker task. The worker runs
/// every `set` under its own token, so a caller that cancels after enqueueing
/// does not stop the cache from being warmed. Failures only reach the log.
#[derive(Clone)]
pub struct CacheWarmer {
    sender: mpsc::Sender<WarmMessage>,
}

impl CacheWarmer {
    /// Spawn the worker on the current tokio runtime.
    /// The worker stops once every clone of the returned warmer is dropped.
    pub fn spawn(
        cache: Arc<dyn ResultCache>,
        ttl: Option<TtlMs>,
        capacity: usize,
    ) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(Self::run(receiver, cache, ttl));
        (Self { sender }, handle)
    }

    /// Queue a cache write. Returns `false` if the job was dropped.
    pub fn warm(&self, id: ReceiptId, points: Points) -> bool {
        match self.sender.try_send(WarmMessage::Warm { id, points }) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(WarmMessage::Warm { id, .. })) => {
                warn!("Cache warm queue is full, dropping job for receipt '{}'", id);
                false
            }
            Err(mpsc::error::TrySendError::Closed(WarmMessage::Warm { id, .. })) => {
                warn!("Cache warmer has stopped, dropping job for receipt '{}'", id);
                false
            }
            Err(_) => false,
        }
    }

    /// Wait until every job queued before this call has been applied
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.sender.send(WarmMessage::Flush(done_tx)).await.is_err() {
            return;
        }
        let _ = done_rx.await;
    }

    async fn run(
        mut receiver: mpsc::Receiver<WarmMessage>,
        cache: Arc<dyn ResultCache>,
        ttl: Option<TtlMs>,
    ) {
        // Detached from every request's cancellation scope
        let ctx = CancellationToken::new();

        while let Some(message) = receiver.recv().await {
            match message {
                WarmMessage::Warm { id, points } => {
                    match cache.set(&ctx, id.clone(), points, ttl).await {
                        Ok(()) => debug!("Warmed cache for receipt '{}' ({} points)", id, points),
                        Err(e) => warn!("Error setting cache for receipt '{}': {}", id, e),
                    }
                }
                WarmMessage::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }

        debug!("Cache warmer stopped");
    }
}

impl std::fmt::Debug for CacheWarmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheWarmer")
            .field("capacity", &self.sender.max_capacity())
            .finish()
    }
}
