use axum::ServiceExt;
use axum::extract::Request;
use receipts::ReceiptProcessor;
use server_http::{AppState, build_router};
use shared::config::Config;
use std::sync::Arc;
use storage_engine::UnifiedStorageFactory;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file (if exists)
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    let config = Config::from_env();

    // Initialize tracing, RUST_LOG wins over the environment default
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.env.default_log_level()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if dotenv_loaded {
        info!("Loaded environment variables from .env file");
    } else {
        info!("No .env file found, using system environment variables");
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    info!("Starting receipt processor ({:?})...", config.env);

    let store = UnifiedStorageFactory::points_store();
    let cache = UnifiedStorageFactory::result_cache(config.cache_backend);
    let processor = ReceiptProcessor::new(
        store,
        cache,
        config.cache_ttl,
        config.warm_queue_capacity,
    );

    let shutdown = CancellationToken::new();
    let state = AppState::new(Arc::new(processor), shutdown.clone());
    let app = build_router(state, &config);

    let address = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", address, e);
            std::process::exit(1);
        }
    };

    info!("HTTP Server listening on http://{}", address);

    let mut server = tokio::spawn(
        axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
            .with_graceful_shutdown(shutdown.clone().cancelled_owned())
            .into_future(),
    );

    tokio::select! {
        _ = shutdown_signal() => {}
        result = &mut server => {
            match result {
                Ok(Ok(())) => info!("Server stopped"),
                Ok(Err(e)) => error!("Server error: {}", e),
                Err(e) => error!("Server task failed: {}", e),
            }
            return;
        }
    }

    info!("Shutting down gracefully...");
    shutdown.cancel();

    match tokio::time::timeout(config.shutdown_timeout, server).await {
        Ok(Ok(Ok(()))) => info!("Server shutdown complete"),
        Ok(Ok(Err(e))) => error!("Server error during shutdown: {}", e),
        Ok(Err(e)) => error!("Server task failed during shutdown: {}", e),
        Err(_) => warn!(
            "In-flight requests did not finish within {:?}, exiting",
            config.shutdown_timeout
        ),
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}
