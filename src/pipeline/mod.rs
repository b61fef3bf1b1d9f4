//! Pipeline stages for batch text extraction.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap an
//! implementation (e.g. a different rasteriser) without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! images:     scan ──▶ mime ──▶ extract ──────────────▶ write
//! documents:  scan ──▶ render ──▶ extract (per page) ──▶ assemble ──▶ write
//! ```
//!
//! 1. [`scan`]     — enumerate supported files in the input directory
//! 2. [`mime`]     — determine an image's MIME type (content, then extension)
//! 3. [`render`]   — rasterise PDF pages to PNG bytes; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 4. [`assemble`] — join per-page results with page markers
//!
//! The extraction step itself lives in [`crate::extract`]; writing is part
//! of the driver.

pub mod assemble;
pub mod mime;
pub mod render;
pub mod scan;
