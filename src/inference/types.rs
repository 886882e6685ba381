//! Inference types
//!
//! Request options and results exchanged with the OCR/layout backend.

use serde::{Deserialize, Serialize};

/// Requested output flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
}

/// Per-call options. Layout is only computed when asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InferenceOptions {
    pub include_layout: bool,
    pub output_format: OutputFormat,
}

/// Normalised layout region returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRegion {
    /// Region label (text, title, table, figure, ...)
    pub label: String,
    /// `[x0, y0, x1, y1]` in page pixels
    pub bbox: [f32; 4],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutInfo {
    #[serde(default)]
    pub regions: Vec<LayoutRegion>,
}

/// Result of one inference call
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InferenceOutput {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    /// Backend-specific structured output, passed through as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<serde_json::Value>,
}

/// Inference error types
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Inference backend unavailable: {0}")]
    Unavailable(String),

    #[error("Inference failed: {0}")]
    Failed(String),

    #[error("Invalid inference response: {0}")]
    InvalidResponse(String),

    #[error("Inference timed out after {0} seconds")]
    Timeout(u64),
}
