use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use shared::config::Config;
use tower_http::normalize_path::NormalizePath;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Router wrapped so paths are normalized before routing
pub type App = NormalizePath<Router>;

/// Build and configure the application router
pub fn build_router(state: AppState, config: &Config) -> App {
    let router = Router::new()
        .route("/", get(handlers::root))
        // Health check
        .route("/health", get(handlers::health_check))
        // Receipt routes
        .route("/receipts/process", post(handlers::process_receipt))
        .route("/receipts/{id}/points", get(handlers::get_points))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.request_timeout))
        .with_state(state);

    // A layer added with Router::layer runs after a route is matched
    NormalizePath::trim_trailing_slash(router)
}
