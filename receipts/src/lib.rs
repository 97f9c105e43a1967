pub mod domain;
pub mod ports;
pub mod processing;
pub mod scoring;

pub use domain::{Amount, LineItem, Points, PurchaseRecord, ReceiptId};
pub use processing::{CacheWarmer, ReceiptOperations, ReceiptProcessor};
pub use scoring::{ScoreBreakdown, compute_score};
