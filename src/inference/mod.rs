//! Inference Module
//!
//! Capability interface for the external OCR/layout engine.
//!
//! The engine is a black box: given one page image it returns the extracted
//! text and, when requested, layout regions. `HttpInferenceClient` talks to
//! a backend serving `POST /predict` and `GET /health`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ocr_extract_server::inference::{HttpInferenceClient, InferenceClient, InferenceOptions};
//!
//! let client = HttpInferenceClient::new(&config.inference)?;
//! let output = client.infer(&png_bytes, &InferenceOptions::default()).await?;
//! println!("{}", output.text);
//! ```

mod client;
mod types;

pub use client::{HttpInferenceClient, InferenceClient};
pub use types::{
    InferenceError, InferenceOptions, InferenceOutput, LayoutInfo, LayoutRegion, OutputFormat,
};
