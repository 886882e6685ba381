//! OCR Extract Server
//!
//! Document text extraction over HTTP, backed by an S3-compatible object
//! store and an OCR inference service.

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ocr_extract_server::config::{Config, StorageBackend};
use ocr_extract_server::document::MupdfRasterizer;
use ocr_extract_server::inference::{HttpInferenceClient, InferenceClient};
use ocr_extract_server::storage::{MountedStore, ObjectStore, S3Client};
use ocr_extract_server::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "ocr_extract_server=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        Config::default()
    });

    tracing::info!("Starting OCR Extract Server v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn ObjectStore> = match config.storage.backend {
        StorageBackend::S3 => {
            tracing::info!("S3 endpoint: {}", config.storage.endpoint);
            let s3_client = S3Client::new(&config.storage)
                .await
                .context("Failed to initialize S3 client")?;
            tracing::info!("S3 bucket: {}", s3_client.bucket());
            Arc::new(s3_client)
        }
        StorageBackend::Mount => {
            tracing::info!("Serving objects from mount {}", config.storage.mount_path.display());
            Arc::new(MountedStore::new(config.storage.mount_path.clone()))
        }
    };

    let inference = HttpInferenceClient::new(&config.inference)
        .context("Failed to initialize inference client")?;
    if inference.is_available().await {
        tracing::info!("Inference backend {} is reachable", config.inference.endpoint);
    } else {
        tracing::warn!(
            "Inference backend {} is not reachable yet; pages will fail until it is",
            config.inference.endpoint
        );
    }
    tracing::info!(
        "Model {} with at most {} concurrent page(s)",
        inference.model_name(),
        config.inference.max_concurrency
    );

    let addr = config.server.bind_address();

    // Create application state
    let app_state = AppState::new(
        config,
        store,
        Arc::new(MupdfRasterizer),
        Arc::new(inference),
    );

    let app = build_router(app_state);

    // Start server with graceful shutdown
    tracing::info!("OCR Extract Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
