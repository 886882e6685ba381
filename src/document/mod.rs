//! Document classification and page splitting
//!
//! - `types`: resolved documents, page units, media classification
//! - `splitter`: turns one resolved document into ordered page units
//! - `rasterizer`: MuPDF rendering of paged containers

mod error;
mod rasterizer;
mod splitter;
mod types;

pub use error::{DocumentError, DocumentResult};
pub use rasterizer::{MupdfRasterizer, PageRasterizer, RasterOptions};
pub use splitter::DocumentSplitter;
pub use types::{is_generic_media_type, sniff_media_type, MediaKind, PageUnit, ResolvedDocument};

#[cfg(test)]
pub(crate) use splitter::tests::{FakeRasterizer, WHITE_PIXEL_PNG};
