//! PDF opening and page rasterisation via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the whole document pass
//! onto a thread designed for blocking work, so the async driver never
//! stalls during CPU-heavy rendering.
//!
//! ## Handle lifetime
//!
//! The document handle lives entirely inside the blocking task and is
//! released by drop on every exit path — normal completion and early
//! return alike. Per-page failures are captured into the page list *before*
//! the drop runs, so releasing the handle can never mask the error being
//! reported.

use crate::error::DocumentError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};

/// One rasterised page: PNG bytes, or the failure detail for that page.
///
/// `number` is 1-based, matching what output markers display.
#[derive(Debug)]
pub struct RenderedPage {
    pub number: usize,
    pub png: Result<Vec<u8>, String>,
}

/// All pages of a document, in natural order.
#[derive(Debug)]
pub struct RenderedDocument {
    pub total_pages: usize,
    pub pages: Vec<RenderedPage>,
}

/// Open a PDF and rasterise every page to PNG at the given DPI.
///
/// A single page failing to render or encode is not fatal to the document:
/// the failure is recorded in that page's slot and iteration continues.
/// Only open-level problems (missing file, password, corrupt document)
/// reject the whole document.
pub async fn render_document(
    pdf_path: &Path,
    dpi: u32,
) -> Result<RenderedDocument, DocumentError> {
    let path = pdf_path.to_path_buf();
    let result = tokio::task::spawn_blocking(move || render_blocking(&path, dpi))
        .await
        .map_err(|e| DocumentError::Malformed {
            path: pdf_path.to_path_buf(),
            detail: format!("render task panicked: {e}"),
        })?;

    result
}

/// Blocking implementation of the document pass.
fn render_blocking(pdf_path: &Path, dpi: u32) -> Result<RenderedDocument, DocumentError> {
    if !pdf_path.exists() {
        return Err(DocumentError::NotFound {
            path: pdf_path.to_path_buf(),
        });
    }

    let pdfium = Pdfium::default();

    let document = pdfium
        .load_pdf_from_file(pdf_path, None)
        .map_err(|e| classify_open_error(pdf_path, format!("{e:?}")))?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    debug!("Opened {}: {} page(s)", pdf_path.display(), total_pages);

    // pdfium renders at 72 points per inch natively; scaling by dpi/72
    // yields the requested resolution regardless of physical page size.
    let render_config = PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / 72.0);

    let mut rendered = Vec::with_capacity(total_pages);
    for (idx, page) in pages.iter().enumerate() {
        let number = idx + 1;
        let png = rasterise_page(&page, &render_config);
        match &png {
            Ok(bytes) => debug!("Rendered page {} → {} PNG bytes", number, bytes.len()),
            Err(detail) => warn!(
                "Error processing page {} of {}: {}",
                number,
                pdf_path.display(),
                detail
            ),
        }
        rendered.push(RenderedPage { number, png });
    }

    Ok(RenderedDocument {
        total_pages,
        pages: rendered,
    })
    // `document` drops here: the handle is released exactly once, after all
    // per-page outcomes have been recorded.
}

/// Distinguish password protection from any other open failure.
fn classify_open_error(path: &Path, detail: String) -> DocumentError {
    if detail.to_ascii_lowercase().contains("password") {
        DocumentError::PasswordProtected {
            path: path.to_path_buf(),
        }
    } else {
        DocumentError::Malformed {
            path: path.to_path_buf(),
            detail,
        }
    }
}

/// Render one page and encode it as PNG bytes.
fn rasterise_page(page: &PdfPage, config: &PdfRenderConfig) -> Result<Vec<u8>, String> {
    let bitmap = page
        .render_with_config(config)
        .map_err(|e| format!("rasterisation failed: {e:?}"))?;
    encode_png(&bitmap.as_image())
}

/// PNG-encode a rendered page image.
///
/// PNG over JPEG: lossless compression preserves text crispness, and JPEG
/// artefacts on rendered text measurably degrade transcription accuracy.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| format!("PNG encoding failed: {e}"))?;
    Ok(buf)
}
