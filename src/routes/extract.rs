//! Extraction endpoints
//!
//! - `POST /extract_text_and_analyze`: per-page text, metrics and layout
//! - `POST /extract_text_simple`: all pages joined into one text

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::Instrument;

use crate::error::{AppError, Result};
use crate::ingest::ExtractRequest;
use crate::response::{FullAnalysisResponse, SimpleResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/extract_text_and_analyze", post(extract_text_and_analyze))
        .route("/extract_text_simple", post(extract_text_simple))
}

/// Turn body rejections into the structured error shape
fn parse_body(body: std::result::Result<Json<ExtractRequest>, JsonRejection>) -> Result<ExtractRequest> {
    body.map(|Json(request)| request)
        .map_err(|rejection| AppError::InvalidInput(rejection.body_text()))
}

async fn extract_text_and_analyze(
    State(state): State<AppState>,
    body: std::result::Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<FullAnalysisResponse>> {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("extract_text_and_analyze", %request_id);

    async move {
        let (input, options) = parse_body(body)?.into_parts()?;
        let outcome = state.pipeline().run(input, options).await?;

        tracing::info!(
            "Analysis finished in {:?}: {} page(s), success={}",
            outcome.elapsed,
            outcome.aggregate.page_results.len(),
            outcome.aggregate.overall_success
        );

        Ok(Json(state.assembler().full_analysis(
            outcome,
            options.output_format,
            options.include_layout_analysis,
        )))
    }
    .instrument(span)
    .await
}

async fn extract_text_simple(
    State(state): State<AppState>,
    body: std::result::Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<SimpleResponse>> {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("extract_text_simple", %request_id);

    async move {
        let (input, mut options) = parse_body(body)?.into_parts()?;
        // Simple extraction never pays for layout; metrics come from the joined text
        options.include_layout_analysis = false;
        options.include_character_metrics = false;

        let outcome = state.pipeline().run(input, options).await?;

        tracing::info!(
            "Simple extraction finished in {:?}: {} page(s), success={}",
            outcome.elapsed,
            outcome.aggregate.page_results.len(),
            outcome.aggregate.overall_success
        );

        Ok(Json(state.assembler().simple(outcome)))
    }
    .instrument(span)
    .await
}
