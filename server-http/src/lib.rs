pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod validation;

// Re-export key types
pub use routes::{App, build_router};
pub use state::AppState;
