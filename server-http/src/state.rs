use receipts::ReceiptOperations;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub receipts: Arc<dyn ReceiptOperations>,
    /// Cancelled on shutdown. Every request works under a child of it.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(receipts: Arc<dyn ReceiptOperations>, shutdown: CancellationToken) -> Self {
        Self { receipts, shutdown }
    }

    pub fn request_context(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}
