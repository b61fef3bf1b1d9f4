//! MIME detection for the image pipeline.
//!
//! Content inspection comes first because extensions lie: a `.png` that is
//! really a JPEG would otherwise reach the API with the wrong declared type.
//! When the content is unreadable the sniffer degrades to extension-based
//! guessing, then to a small hard-coded table, and only then gives up —
//! an undetermined type skips the file before any remote call is made.
//!
//! The document pipeline never needs this module: rasterised pages are
//! always produced as PNG by the renderer.

use image::ImageFormat;
use image::ImageReader;
use std::path::Path;
use tracing::debug;

/// Fixed MIME type of rasterised document pages.
pub const PAGE_MIME_TYPE: &str = "image/png";

/// Determine the MIME type of an image file, or `None` when undetermined.
///
/// Stages, in order:
/// 1. content inspection (decode the file header);
/// 2. extension-based format guess;
/// 3. hard-coded extension table.
pub fn sniff_mime(path: &Path) -> Option<&'static str> {
    if let Some(mime) = sniff_content(path) {
        return Some(mime);
    }

    if let Ok(format) = ImageFormat::from_path(path) {
        debug!(
            "MIME for {} guessed from extension",
            path.file_name().unwrap_or_default().to_string_lossy()
        );
        return Some(format.to_mime_type());
    }

    extension_table(path)
}

/// Stage 1: read the file header and let the decoder identify the format.
///
/// Built from a plain reader rather than `ImageReader::open` so the guess
/// comes from the magic bytes alone, with no extension hint.
fn sniff_content(path: &Path) -> Option<&'static str> {
    let file = std::fs::File::open(path).ok()?;
    let reader = ImageReader::new(std::io::BufReader::new(file))
        .with_guessed_format()
        .ok()?;
    reader.format().map(|f| f.to_mime_type())
}

/// Stage 3: last-resort table for the most common extensions.
fn extension_table(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn content_wins_over_extension() {
        // A real PNG stored with a .jpg extension must be reported as PNG.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mislabelled.jpg");
        RgbImage::from_pixel(4, 4, Rgb([0, 128, 255]))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();

        assert_eq!(sniff_mime(&path), Some("image/png"));
    }

    #[test]
    fn extension_fallback_when_content_is_not_an_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.gif");
        std::fs::write(&path, b"definitely not a gif").unwrap();

        assert_eq!(sniff_mime(&path), Some("image/gif"));
    }

    #[test]
    fn table_fallback_for_missing_file() {
        // Nothing on disk: content sniffing fails, extension guess still works
        // for formats the table knows.
        assert_eq!(
            sniff_mime(Path::new("/nonexistent/photo.webp")),
            Some("image/webp")
        );
    }

    #[test]
    fn undetermined_for_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mystery.xyz");
        std::fs::write(&path, b"not an image at all").unwrap();

        assert_eq!(sniff_mime(&path), None);
    }

    #[test]
    fn extension_table_covers_the_documented_set() {
        assert_eq!(extension_table(Path::new("a.jpg")), Some("image/jpeg"));
        assert_eq!(extension_table(Path::new("a.JPEG")), Some("image/jpeg"));
        assert_eq!(extension_table(Path::new("a.png")), Some("image/png"));
        assert_eq!(extension_table(Path::new("a.webp")), Some("image/webp"));
        assert_eq!(extension_table(Path::new("a.bmp")), None);
    }
}
