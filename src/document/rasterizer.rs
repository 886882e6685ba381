//! Page rasterisation for paged containers
//!
//! MuPDF is not thread-safe and rendering is CPU-bound, so the document is
//! opened inside the calling thread and never escapes it. Callers run this
//! on the blocking pool.

use std::io::Cursor;

use image::{DynamicImage, RgbImage};
use mupdf::{Colorspace, Document, Matrix};

use super::error::{DocumentError, DocumentResult};

/// Rendering knobs shared by every page of a document
#[derive(Debug, Clone, Copy)]
pub struct RasterOptions {
    /// Zoom factor applied to the page's native 72 DPI
    pub scale: f32,
    /// Refuse containers with more pages than this
    pub max_pages: usize,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            max_pages: 200,
        }
    }
}

/// Turns a paged container into one encoded image per page
pub trait PageRasterizer: Send + Sync {
    /// Render every page in order. Each returned buffer is independently owned.
    fn rasterize(&self, data: &[u8], options: &RasterOptions) -> DocumentResult<Vec<Vec<u8>>>;
}

/// MuPDF-backed PDF rasterizer producing PNG pages
#[derive(Debug, Default, Clone, Copy)]
pub struct MupdfRasterizer;

impl PageRasterizer for MupdfRasterizer {
    fn rasterize(&self, data: &[u8], options: &RasterOptions) -> DocumentResult<Vec<Vec<u8>>> {
        let doc = Document::from_bytes(data, "application/pdf")?;
        let page_count = doc.page_count()?.max(0) as usize;

        if page_count == 0 {
            return Err(DocumentError::EmptyDocument);
        }
        if page_count > options.max_pages {
            return Err(DocumentError::TooManyPages {
                count: page_count,
                limit: options.max_pages,
            });
        }

        let scale = options.scale.clamp(0.5, 4.0);
        let matrix = Matrix::new_scale(scale, scale);
        let colorspace = Colorspace::device_rgb();

        let mut pages = Vec::with_capacity(page_count);
        for index in 0..page_count {
            let page = doc.load_page(index as i32)?;
            let pixmap = page
                .to_pixmap(&matrix, &colorspace, false, true)
                .map_err(|e| DocumentError::RenderError(format!("page {}: {}", index, e)))?;
            pages.push(encode_png(&pixmap)?);
        }

        tracing::debug!("Rasterised {} PDF pages at scale {}", page_count, scale);
        Ok(pages)
    }
}

fn encode_png(pixmap: &mupdf::Pixmap) -> DocumentResult<Vec<u8>> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize;

    let mut rgb_buffer = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = (y * width as usize + x) * n;
            let r = samples.get(offset).copied().unwrap_or(255);
            let g = samples.get(offset + 1).copied().unwrap_or(r);
            let b = samples.get(offset + 2).copied().unwrap_or(r);
            rgb_buffer.extend_from_slice(&[r, g, b]);
        }
    }

    let img = RgbImage::from_raw(width, height, rgb_buffer)
        .ok_or_else(|| DocumentError::ImageError("Failed to create image buffer".to_string()))?;

    let mut output = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut output), image::ImageFormat::Png)
        .map_err(|e| DocumentError::ImageError(e.to_string()))?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentSplitter, ResolvedDocument};
    use std::sync::Arc;

    /// Two blank pages: 72x72pt then 36x72pt
    const TWO_PAGE_PDF: &[u8] = b"\
%PDF-1.4\n\
1 0 obj\n\
<< /Type /Catalog /Pages 2 0 R >>\n\
endobj\n\
2 0 obj\n\
<< /Type /Pages /Kids [3 0 R 4 0 R] /Count 2 >>\n\
endobj\n\
3 0 obj\n\
<< /Type /Page /Parent 2 0 R /MediaBox [0 0 72 72] >>\n\
endobj\n\
4 0 obj\n\
<< /Type /Page /Parent 2 0 R /MediaBox [0 0 36 72] >>\n\
endobj\n\
xref\n\
0 5\n\
0000000000 65535 f \n\
0000000009 00000 n \n\
0000000058 00000 n \n\
0000000121 00000 n \n\
0000000190 00000 n \n\
trailer\n\
<< /Size 5 /Root 1 0 R >>\n\
startxref\n\
259\n\
%%EOF\n\
";

    #[test]
    fn test_renders_one_png_per_page_in_order() {
        let pages = MupdfRasterizer
            .rasterize(TWO_PAGE_PDF, &RasterOptions::default())
            .unwrap();
        assert_eq!(pages.len(), 2);

        for page in &pages {
            assert_eq!(image::guess_format(page).unwrap(), image::ImageFormat::Png);
        }

        let first = image::load_from_memory(&pages[0]).unwrap();
        let second = image::load_from_memory(&pages[1]).unwrap();
        // Page order follows the page tree: the square page comes first
        assert!(first.width() > second.width());
        assert_eq!(first.height(), second.height());
    }

    #[test]
    fn test_page_limit_enforced() {
        let options = RasterOptions {
            max_pages: 1,
            ..Default::default()
        };
        let err = MupdfRasterizer.rasterize(TWO_PAGE_PDF, &options).unwrap_err();
        assert!(
            matches!(err, DocumentError::TooManyPages { count: 2, limit: 1 }),
            "{:?}",
            err
        );
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(MupdfRasterizer
            .rasterize(b"definitely not a pdf", &RasterOptions::default())
            .is_err());
    }

    #[tokio::test]
    async fn test_splitter_yields_indexed_units_from_real_pdf() {
        let splitter = DocumentSplitter::new(Arc::new(MupdfRasterizer), RasterOptions::default());
        let doc = ResolvedDocument::new(TWO_PAGE_PDF.to_vec(), "application/pdf", "inline payload");

        let units = splitter.split(doc).await.unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].index, 0);
        assert_eq!(units[1].index, 1);
        assert_ne!(units[0].image_bytes, units[1].image_bytes);
    }
}
