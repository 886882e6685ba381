//! Document splitter
//!
//! Turns a resolved document into the ordered page units handed to inference.

use std::sync::Arc;

use super::error::{DocumentError, DocumentResult};
use super::rasterizer::{PageRasterizer, RasterOptions};
use super::types::{MediaKind, PageUnit, ResolvedDocument};

#[derive(Clone)]
pub struct DocumentSplitter {
    rasterizer: Arc<dyn PageRasterizer>,
    options: RasterOptions,
}

impl DocumentSplitter {
    pub fn new(rasterizer: Arc<dyn PageRasterizer>, options: RasterOptions) -> Self {
        Self {
            rasterizer,
            options,
        }
    }

    /// Split a document into one or more page units, in page order
    pub async fn split(&self, document: ResolvedDocument) -> DocumentResult<Vec<PageUnit>> {
        let kind = MediaKind::from_mime(document.media_type())
            .ok_or_else(|| DocumentError::UnsupportedFormat(document.media_type().to_string()))?;

        match kind {
            MediaKind::Image => {
                if image::guess_format(document.bytes()).is_err() {
                    return Err(DocumentError::InvalidContent(format!(
                        "payload declared as {} is not a recognisable image",
                        document.media_type()
                    )));
                }
                Ok(vec![PageUnit {
                    index: 0,
                    image_bytes: document.into_bytes(),
                }])
            }
            MediaKind::Pdf => {
                let rasterizer = self.rasterizer.clone();
                let options = self.options;
                let data = document.into_bytes();

                let pages = tokio::task::spawn_blocking(move || rasterizer.rasterize(&data, &options))
                    .await
                    .map_err(|e| DocumentError::RenderError(format!("Task join error: {}", e)))??;

                if pages.is_empty() {
                    return Err(DocumentError::EmptyDocument);
                }

                Ok(pages
                    .into_iter()
                    .enumerate()
                    .map(|(index, image_bytes)| PageUnit { index, image_bytes })
                    .collect())
            }
        }
    }
}
