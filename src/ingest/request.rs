//! Extraction request model
//!
//! The wire body carries `image_data` and `file_name` side by side. It is
//! validated into a `DocumentInput` before anything touches storage.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::inference::OutputFormat;

/// JSON body accepted by both extraction endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractRequest {
    /// `data:<media-type>;base64,<payload>`
    #[serde(default)]
    pub image_data: Option<String>,
    /// Object name relative to the configured bucket or mount
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub output_format: OutputFormat,
    #[serde(default = "default_true")]
    pub include_character_metrics: bool,
    #[serde(default = "default_true")]
    pub include_layout_analysis: bool,
    /// Whole-request deadline in milliseconds
    #[serde(default)]
    pub deadline_ms: Option<u64>,
}

fn default_true() -> bool {
    true
}

/// Where the document bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentInput {
    Inline(InlinePayload),
    Stored(StoredReference),
}

/// Document embedded in the request as an encoded data URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlinePayload {
    pub encoded: String,
}

/// Document expected to already exist in object storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReference {
    pub object_name: String,
}

/// Per-request processing options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    pub output_format: OutputFormat,
    pub include_character_metrics: bool,
    pub include_layout_analysis: bool,
    pub deadline: Option<Duration>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Json,
            include_character_metrics: true,
            include_layout_analysis: true,
            deadline: None,
        }
    }
}

impl ExtractRequest {
    /// Split into the validated input variant and processing options
    pub fn into_parts(self) -> Result<(DocumentInput, ExtractOptions)> {
        let image_data = self.image_data.filter(|s| !s.trim().is_empty());
        let file_name = self.file_name.filter(|s| !s.trim().is_empty());

        let input = match (image_data, file_name) {
            (Some(encoded), None) => DocumentInput::Inline(InlinePayload { encoded }),
            (None, Some(object_name)) => DocumentInput::Stored(StoredReference { object_name }),
            (Some(_), Some(_)) => {
                return Err(AppError::InvalidInput(
                    "provide exactly one of image_data or file_name, not both".to_string(),
                ))
            }
            (None, None) => {
                return Err(AppError::InvalidInput(
                    "one of image_data or file_name is required".to_string(),
                ))
            }
        };

        if self.deadline_ms == Some(0) {
            return Err(AppError::InvalidInput("deadline_ms must be positive".to_string()));
        }

        let options = ExtractOptions {
            output_format: self.output_format,
            include_character_metrics: self.include_character_metrics,
            include_layout_analysis: self.include_layout_analysis,
            deadline: self.deadline_ms.map(Duration::from_millis),
        };

        Ok((input, options))
    }
}
