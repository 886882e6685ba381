//! Core document types
//!
//! Request-scoped values that flow from input resolution into the splitter.

use sha2::{Digest, Sha256};

/// Raw document bytes resolved from an inline payload or a stored object
#[derive(Debug)]
pub struct ResolvedDocument {
    bytes: Vec<u8>,
    media_type: String,
    source_description: String,
    sha256: String,
}

impl ResolvedDocument {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>, source: impl Into<String>) -> Self {
        let sha256 = hex::encode(Sha256::digest(&bytes));
        Self {
            bytes,
            media_type: media_type.into(),
            source_description: source.into(),
            sha256,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn source_description(&self) -> &str {
        &self.source_description
    }

    /// Hex-encoded SHA-256 of the document bytes
    pub fn sha256(&self) -> &str {
        &self.sha256
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// A single page raster image, the unit of inference dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageUnit {
    /// 0-based page position in the source document
    pub index: usize,
    pub image_bytes: Vec<u8>,
}

/// What the splitter does with a given media type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Single raster image, passed through untouched
    Image,
    /// Multi-page container rendered page by page
    Pdf,
}

impl MediaKind {
    /// Classify a MIME type, ignoring parameters such as `; charset=...`
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "application/pdf" | "application/x-pdf" => Some(Self::Pdf),
            "image/png" | "image/jpeg" | "image/jpg" | "image/webp" | "image/tiff"
            | "image/bmp" | "image/gif" => Some(Self::Image),
            _ => None,
        }
    }
}

/// Detect a MIME type from magic bytes
pub fn sniff_media_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"%PDF") {
        return Some("application/pdf");
    }

    match image::guess_format(bytes).ok()? {
        image::ImageFormat::Png => Some("image/png"),
        image::ImageFormat::Jpeg => Some("image/jpeg"),
        image::ImageFormat::WebP => Some("image/webp"),
        image::ImageFormat::Tiff => Some("image/tiff"),
        image::ImageFormat::Bmp => Some("image/bmp"),
        image::ImageFormat::Gif => Some("image/gif"),
        _ => None,
    }
}

/// True for MIME types that say nothing about the content
pub fn is_generic_media_type(mime: &str) -> bool {
    let essence = mime.split(';').next().unwrap_or_default().trim();
    essence.is_empty()
        || essence.eq_ignore_ascii_case("application/octet-stream")
        || essence.eq_ignore_ascii_case("binary/octet-stream")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    #[test]
    fn test_media_kind_from_mime() {
        assert_eq!(MediaKind::from_mime("application/pdf"), Some(MediaKind::Pdf));
        assert_eq!(MediaKind::from_mime("IMAGE/PNG"), Some(MediaKind::Image));
        assert_eq!(
            MediaKind::from_mime("image/jpeg; quality=high"),
            Some(MediaKind::Image)
        );
        assert_eq!(MediaKind::from_mime("text/plain"), None);
    }

    #[test]
    fn test_sniff_media_type() {
        assert_eq!(sniff_media_type(b"%PDF-1.7\n"), Some("application/pdf"));
        assert_eq!(sniff_media_type(PNG_MAGIC), Some("image/png"));
        assert_eq!(sniff_media_type(b"hello world"), None);
    }

    #[test]
    fn test_resolved_document_digest() {
        let doc = ResolvedDocument::new(b"abc".to_vec(), "image/png", "inline payload");
        assert_eq!(
            doc.sha256(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(doc.len(), 3);
        assert!(!doc.is_empty());
    }

    #[test]
    fn test_generic_media_types() {
        assert!(is_generic_media_type("application/octet-stream"));
        assert!(is_generic_media_type(""));
        assert!(!is_generic_media_type("image/png"));
    }
}
