pub mod cache_warmer;
pub mod operation;
pub mod receipt_processor;

pub use cache_warmer::CacheWarmer;
pub use operation::ReceiptOperations;
pub use receipt_processor::ReceiptProcessor;
