//! Error types for the OCR extraction server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::document::DocumentError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Request-fatal error type
///
/// Anything that stops a request before pages reach the inference backend
/// ends up here. Page-local failures are recorded on the page instead.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Stable error codes exposed to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidInput,
    UnsupportedFormat,
    ResourceNotFound,
    UpstreamUnavailable,
    InferenceFailed,
    Timeout,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            Self::ResourceNotFound => "RESOURCE_NOT_FOUND",
            Self::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            Self::InferenceFailed => "INFERENCE_FAILED",
            Self::Timeout => "TIMEOUT",
            Self::Internal => "INTERNAL",
        }
    }
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput(_) => ErrorCode::InvalidInput,
            Self::UnsupportedFormat(_) => ErrorCode::UnsupportedFormat,
            Self::ResourceNotFound(_) => ErrorCode::ResourceNotFound,
            Self::UpstreamUnavailable(_) => ErrorCode::UpstreamUnavailable,
            Self::Timeout(_) => ErrorCode::Timeout,
            Self::Internal(_) => ErrorCode::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            Self::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short variant name, reported as `error_type`
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "InvalidInput",
            Self::UnsupportedFormat(_) => "UnsupportedFormat",
            Self::ResourceNotFound(_) => "ResourceNotFound",
            Self::UpstreamUnavailable(_) => "UpstreamUnavailable",
            Self::Timeout(_) => "Timeout",
            Self::Internal(_) => "Internal",
        }
    }
}

/// Storage-specific errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// Connection resets, throttling, 5xx responses. Worth retrying.
    #[error("Transient storage failure: {0}")]
    Transient(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Storage error: {0}")]
    Backend(String),
}

impl StorageError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ObjectNotFound(key) => AppError::ResourceNotFound(key),
            StorageError::Transient(msg) => AppError::UpstreamUnavailable(msg),
            StorageError::AccessDenied(msg) => {
                AppError::UpstreamUnavailable(format!("access denied: {}", msg))
            }
            StorageError::Backend(msg) => AppError::UpstreamUnavailable(msg),
        }
    }
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::UnsupportedFormat(mime) => AppError::UnsupportedFormat(mime),
            DocumentError::EmptyDocument
            | DocumentError::TooManyPages { .. }
            | DocumentError::InvalidContent(_)
            | DocumentError::ParseError(_) => AppError::InvalidInput(err.to_string()),
            DocumentError::RenderError(_) | DocumentError::ImageError(_) => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: ErrorCode,
    pub error_type: &'static str,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            success: false,
            error: err.to_string(),
            error_code: err.code(),
            error_type: err.type_name(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            AppError::UpstreamUnavailable(msg) => tracing::error!("Upstream unavailable: {}", msg),
            other => tracing::debug!("Request rejected: {}", other),
        }

        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_errors_map_to_taxonomy() {
        let not_found: AppError = StorageError::ObjectNotFound("scan.pdf".into()).into();
        assert_eq!(not_found.code(), ErrorCode::ResourceNotFound);

        let transient: AppError = StorageError::Transient("connection reset".into()).into();
        assert_eq!(transient.code(), ErrorCode::UpstreamUnavailable);
    }

    #[test]
    fn test_document_errors_map_to_taxonomy() {
        let unsupported: AppError = DocumentError::UnsupportedFormat("text/plain".into()).into();
        assert_eq!(unsupported.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let empty: AppError = DocumentError::EmptyDocument.into();
        assert_eq!(empty.code(), ErrorCode::InvalidInput);
    }

    #[test]
    fn test_error_body_serializes_stable_code() {
        let err = AppError::InvalidInput("missing field".into());
        let body = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error_code"], "INVALID_INPUT");
        assert_eq!(body["error_type"], "InvalidInput");
        assert_eq!(ErrorCode::InvalidInput.as_str(), "INVALID_INPUT");
    }
}
