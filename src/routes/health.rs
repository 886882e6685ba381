//! Health check endpoints

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    pub inference_available: bool,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let inference_available = state.pipeline().aggregator().client().is_available().await;

    Json(HealthResponse {
        status: if inference_available { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        service: "ocr-extract-server",
        inference_available,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
