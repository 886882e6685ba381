//! Inline payload decoding
//!
//! Accepts `data:<media-type>[;param=value]*;base64,<payload>`. Whitespace in
//! the payload is ignored and padding is optional.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use crate::document::{is_generic_media_type, sniff_media_type, ResolvedDocument};
use crate::error::{AppError, Result};

const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decodes inline data-URI payloads. Performs no I/O.
#[derive(Debug, Clone, Copy)]
pub struct PayloadDecoder {
    max_bytes: usize,
}

impl PayloadDecoder {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    pub fn decode(&self, encoded: &str) -> Result<ResolvedDocument> {
        let (declared, payload) = split_data_uri(encoded)?;

        let payload: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        if payload.len() / 4 * 3 > self.max_bytes + 3 {
            return Err(AppError::InvalidInput(format!(
                "payload exceeds {} bytes",
                self.max_bytes
            )));
        }

        let bytes = LENIENT_BASE64
            .decode(payload.as_bytes())
            .map_err(|e| AppError::InvalidInput(format!("malformed base64 payload: {}", e)))?;

        if bytes.is_empty() {
            return Err(AppError::InvalidInput("payload decodes to zero bytes".to_string()));
        }
        if bytes.len() > self.max_bytes {
            return Err(AppError::InvalidInput(format!(
                "payload exceeds {} bytes",
                self.max_bytes
            )));
        }

        let media_type = if is_generic_media_type(&declared) {
            sniff_media_type(&bytes).map(str::to_string).unwrap_or(declared)
        } else {
            declared
        };

        Ok(ResolvedDocument::new(bytes, media_type, "inline payload"))
    }
}

/// Split a data URI into its lowercase media type and encoded payload
fn split_data_uri(encoded: &str) -> Result<(String, &str)> {
    let trimmed = encoded.trim();
    let rest = trimmed
        .get(..5)
        .filter(|scheme| scheme.eq_ignore_ascii_case("data:"))
        .map(|_| &trimmed[5..])
        .ok_or_else(|| {
            AppError::InvalidInput("image_data must be a data URI with a media type".to_string())
        })?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| AppError::InvalidInput("data URI is missing the ',' separator".to_string()))?;

    let mut parts = header.split(';').map(str::trim);
    let media_type = parts.next().unwrap_or_default().to_ascii_lowercase();
    if media_type.is_empty() || !media_type.contains('/') {
        return Err(AppError::InvalidInput(
            "data URI is missing a media type".to_string(),
        ));
    }
    if !parts.any(|p| p.eq_ignore_ascii_case("base64")) {
        return Err(AppError::InvalidInput(
            "data URI must be base64 encoded".to_string(),
        ));
    }

    Ok((media_type, payload))
}
