//! OCR Extract Server Library
//!
//! Accepts a document either inline (base64 data URI) or as an object
//! reference, splits it into page images, runs each page through an
//! inference backend with bounded concurrency and merges the results.
//!
//! # Modules
//!
//! - `ingest`: request parsing and input resolution (inline or stored)
//! - `document`: media detection and page splitting
//! - `inference`: inference backend trait and HTTP adapter
//! - `pipeline`: per-page fan-out, deadline handling and ordered merge
//! - `response`: public response shapes

pub mod config;
pub mod document;
pub mod error;
pub mod inference;
pub mod ingest;
pub mod metrics;
pub mod pipeline;
pub mod response;
pub mod routes;
pub mod state;
pub mod storage;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::{AppError, ErrorCode};
pub use state::AppState;

/// Build the HTTP router for the service
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::health::router())
        .merge(routes::extract::router())
        .layer(DefaultBodyLimit::max(state.config().server.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
