//! # pixtext
//!
//! Batch-extract text from images and PDF documents using a remote vision
//! model.
//!
//! ## Why this crate?
//!
//! Scanned pages, photographed whiteboards, and handwritten notes defeat
//! traditional OCR tooling. Instead of running a local recognition engine,
//! this crate sends each image — or each rasterised PDF page — to a
//! multimodal language model with an extraction prompt and writes the
//! returned text to a matching `.txt` file. The model does the reading; the
//! crate does the batching, typing, and error containment.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Input/
//!  │
//!  ├─ images      scan ─▶ sniff MIME ─▶ extraction call ─▶ Output/<name>.txt
//!  └─ documents   scan ─▶ rasterise pages (pdfium, 150 DPI, PNG)
//!                      ─▶ extraction call per page
//!                      ─▶ aggregate with page markers ─▶ Output/<name>.txt
//! ```
//!
//! Processing is strictly sequential — one item at a time, no shared state
//! between items — and every failure after startup is contained to the item
//! that caused it: the batch always runs to completion.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pixtext::{run, BatchConfig, GeminiClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BatchConfig::default(); // Input/ → Output/
//!     let client = GeminiClient::from_env(&config.model)?;
//!     let summary = run(&config, Arc::new(client)).await?;
//!     println!(
//!         "processed {}, skipped {}",
//!         summary.processed, summary.skipped
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pixtext` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pixtext = { version = "0.3", default-features = false }
//! ```
//!
//! ## Testing without a network
//!
//! The remote call sits behind the [`VisionModel`] trait — one operation,
//! "prompt plus image in, typed response out". Tests implement it with a
//! deterministic fake and point [`BatchConfig`] at temporary directories;
//! nothing in the library hard-codes the real endpoint.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod driver;
pub mod error;
pub mod extract;
pub mod model;
pub mod pipeline;
pub mod progress;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{BatchConfig, BatchConfigBuilder};
pub use driver::{run, ItemOutcome, ItemReport, RunSummary};
pub use error::{AbsenceReason, BatchError, DocumentError, ModelError};
pub use extract::Extraction;
pub use model::{GeminiClient, ImagePayload, ModelResponse, VisionModel, API_KEY_VAR};
pub use progress::{BatchProgress, NoopProgress, ProgressSink};
