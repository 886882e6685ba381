//! Document error types

use thiserror::Error;

/// Errors raised while classifying and splitting a resolved document
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Media type is neither a raster image nor a paged container
    #[error("Unsupported media type: {0}")]
    UnsupportedFormat(String),

    /// Container reported zero pages
    #[error("Document has no pages")]
    EmptyDocument,

    #[error("Document has {count} pages, limit is {limit}")]
    TooManyPages { count: usize, limit: usize },

    /// Bytes do not match the declared media type
    #[error("Invalid content: {0}")]
    InvalidContent(String),

    /// Failed to parse document
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to render a page
    #[error("Render error: {0}")]
    RenderError(String),

    /// Image encoding error
    #[error("Image error: {0}")]
    ImageError(String),
}

pub type DocumentResult<T> = std::result::Result<T, DocumentError>;

impl From<mupdf::Error> for DocumentError {
    fn from(err: mupdf::Error) -> Self {
        DocumentError::ParseError(err.to_string())
    }
}
