pub mod health;
pub mod receipts;

pub use health::{health_check, root};
pub use receipts::{get_points, process_receipt};
