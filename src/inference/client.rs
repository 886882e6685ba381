//! Inference clients
//!
//! Defines the capability trait for the OCR/layout backend and its HTTP adapter.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde::Serialize;

use super::types::{InferenceError, InferenceOptions, InferenceOutput, OutputFormat};
use crate::config::InferenceConfig;

/// OCR/layout backend capability
///
/// Calls are independent of each other. Concurrency limits are enforced by
/// the caller, not the implementation.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Model name reported in `processing_info`
    fn model_name(&self) -> &str;

    /// Check if the backend is reachable
    async fn is_available(&self) -> bool;

    /// Run OCR on one page image
    async fn infer(
        &self,
        image_data: &[u8],
        options: &InferenceOptions,
    ) -> Result<InferenceOutput, InferenceError>;
}

/// Backend request body
#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    image: String,
    use_layout_detection: bool,
    use_doc_orientation_classify: bool,
    use_doc_unwarping: bool,
    output_format: &'a OutputFormat,
}

/// Inference backend reached over HTTP
pub struct HttpInferenceClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    timeout_secs: u64,
    doc_orientation_classify: bool,
    doc_unwarping: bool,
}

impl HttpInferenceClient {
    pub fn new(config: &InferenceConfig) -> Result<Self, InferenceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| InferenceError::Unavailable(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
            doc_orientation_classify: config.doc_orientation_classify,
            doc_unwarping: config.doc_unwarping,
        })
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/health", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn infer(
        &self,
        image_data: &[u8],
        options: &InferenceOptions,
    ) -> Result<InferenceOutput, InferenceError> {
        let url = format!("{}/predict", self.base_url);

        let request = PredictRequest {
            image: base64::engine::general_purpose::STANDARD.encode(image_data),
            use_layout_detection: options.include_layout,
            use_doc_orientation_classify: self.doc_orientation_classify,
            use_doc_unwarping: self.doc_unwarping,
            output_format: &options.output_format,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InferenceError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    InferenceError::Unavailable(format!("Failed to reach {}: {}", url, e))
                } else {
                    InferenceError::Failed(format!("Request to {} failed: {}", url, e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Failed(format!(
                "Backend returned {}: {}",
                status,
                body.trim()
            )));
        }

        let mut output: InferenceOutput = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        // Some backends return layout regardless of the flag
        if !options.include_layout {
            output.layout = None;
        }
        output.text = output.text.trim().to_string();

        Ok(output)
    }
}
