use crate::domain::{Points, PurchaseRecord, ReceiptId};
use async_trait::async_trait;
use shared::Result;
use tokio_util::sync::CancellationToken;

/// The two operations the core exposes to its callers
#[async_trait]
pub trait ReceiptOperations: Send + Sync + 'static {
    /// Score and persist a record, returning its new identifier
    async fn process_receipt(
        &self,
        ctx: &CancellationToken,
        record: &PurchaseRecord,
    ) -> Result<ReceiptId>;

    /// Points for an identifier, or `Error::NotFound`
    async fn get_points(&self, ctx: &CancellationToken, id: &str) -> Result<Points>;
}
