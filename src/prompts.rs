//! Extraction prompts sent alongside each image.
//!
//! Centralising the prompts here serves two purposes:
//!
//! 1. **Single source of truth** — tuning the instruction (e.g. asking for
//!    layout preservation) requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect prompts directly without a
//!    live model call.
//!
//! Callers can override either prompt via
//! [`crate::config::BatchConfig::image_prompt`] /
//! [`crate::config::BatchConfig::page_prompt`]; the constants here are used
//! only when no override is provided.

/// Default prompt for a standalone image file.
pub const IMAGE_PROMPT: &str =
    "Extract all text visible in this image. Provide only the extracted text.";

/// Default prompt for a rasterised document page.
///
/// Asks explicitly for handwritten text: scanned documents are the dominant
/// PDF input, and without the hint some models transcribe only the printed
/// portions of a mixed page.
pub const PAGE_PROMPT: &str = "Extract all handwritten and printed text visible in this image. \
Preserve the general layout if possible, but focus on accurate transcription. \
Provide only the extracted text.";
