//! Top-level driver: validate, scan, process, summarise.
//!
//! The run moves through four states — Init (directories validated, output
//! created), Scanning (candidate inputs enumerated), Processing (each file
//! handled in turn), Done (summary returned). Init failures are fatal and
//! abort before any item is touched; every failure after Init is scoped to
//! one item and degrades to a logged skip.
//!
//! Processing is strictly sequential: one item — one image file or one
//! document page — is fully handled (call issued, response awaited, result
//! recorded) before the next begins. No state is shared between items.

use crate::config::BatchConfig;
use crate::error::BatchError;
use crate::extract::{self, Extraction};
use crate::model::{ImagePayload, VisionModel};
use crate::pipeline::assemble::{assemble_document, PageOutcome, PageText};
use crate::pipeline::mime::{sniff_mime, PAGE_MIME_TYPE};
use crate::pipeline::render;
use crate::pipeline::scan::{self, FileKind, ScannedFile};
use crate::prompts;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// How one input file ended up.
#[derive(Debug)]
pub enum ItemOutcome {
    /// Output written to the given path.
    Processed { output: PathBuf },
    /// No output; the reason is the one-line skip message.
    Skipped { reason: String },
}

/// Per-file record kept for the summary and for tests.
#[derive(Debug)]
pub struct ItemReport {
    pub file_name: String,
    pub outcome: ItemOutcome,
}

/// Result of a whole run. Skips are not errors: a run that skipped every
/// file still completes normally.
#[derive(Debug)]
pub struct RunSummary {
    pub processed: usize,
    pub skipped: usize,
    pub reports: Vec<ItemReport>,
    pub output_dir: PathBuf,
}

/// Process every supported file in the input directory.
///
/// # Errors
/// Returns `Err(BatchError)` only for Init-stage conditions: missing input
/// directory, unreadable input directory, uncreatable output directory.
/// Everything item-scoped is reported through [`RunSummary::reports`].
pub async fn run(
    config: &BatchConfig,
    model: Arc<dyn VisionModel>,
) -> Result<RunSummary, BatchError> {
    // ── Init: directories ────────────────────────────────────────────────
    if !config.input_dir.is_dir() {
        return Err(BatchError::InputDirMissing {
            path: config.input_dir.clone(),
        });
    }

    if !config.output_dir.exists() {
        std::fs::create_dir_all(&config.output_dir).map_err(|e| BatchError::OutputDirCreate {
            path: config.output_dir.clone(),
            source: e,
        })?;
        info!("Created output directory: {}", config.output_dir.display());
    }

    // ── Scanning ─────────────────────────────────────────────────────────
    info!(
        "Scanning for supported files in '{}'...",
        config.input_dir.display()
    );
    let files = scan::scan_input_dir(&config.input_dir)?;
    if let Some(progress) = &config.progress {
        progress.on_scan_complete(files.len());
    }

    // ── Processing ───────────────────────────────────────────────────────
    let mut summary = RunSummary {
        processed: 0,
        skipped: 0,
        reports: Vec::with_capacity(files.len()),
        output_dir: config.output_dir.clone(),
    };

    for file in files {
        let name = file.name();
        if let Some(progress) = &config.progress {
            progress.on_file_start(&name);
        }

        let outcome = match file.kind {
            FileKind::Image => process_image(config, model.as_ref(), &file).await,
            FileKind::Document => process_document(config, model.as_ref(), &file).await,
        };

        match &outcome {
            ItemOutcome::Processed { output } => {
                summary.processed += 1;
                if let Some(progress) = &config.progress {
                    progress.on_file_processed(&name, output);
                }
            }
            ItemOutcome::Skipped { reason } => {
                summary.skipped += 1;
                info!("Skipping {}: {}", name, reason);
                if let Some(progress) = &config.progress {
                    progress.on_file_skipped(&name, reason);
                }
            }
        }

        summary.reports.push(ItemReport {
            file_name: name,
            outcome,
        });
    }

    // ── Done ─────────────────────────────────────────────────────────────
    info!(
        "Processing complete: {} processed, {} skipped, text files saved in '{}'",
        summary.processed,
        summary.skipped,
        summary.output_dir.display()
    );

    Ok(summary)
}

/// Image pipeline: sniff MIME, read bytes, one extraction call, write.
async fn process_image(
    config: &BatchConfig,
    model: &dyn VisionModel,
    file: &ScannedFile,
) -> ItemOutcome {
    let name = file.name();
    info!("Processing {}...", name);

    let Some(mime) = sniff_mime(&file.path) else {
        warn!("Could not determine MIME type for {}. Skipping.", name);
        return skipped("undetermined MIME type");
    };

    let bytes = match tokio::fs::read(&file.path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Error reading {}: {}", name, e);
            return skipped(format!("read failure: {e}"));
        }
    };

    let prompt = config
        .image_prompt
        .as_deref()
        .unwrap_or(prompts::IMAGE_PROMPT);
    let payload = ImagePayload::new(bytes, mime);

    // Single images use the transport default timeout.
    match extract::extract_text(model, prompt, &payload, None, &name).await {
        Extraction::Text(text) => write_output(config, &file.path, &text).await,
        Extraction::Absent(reason) => skipped(reason.to_string()),
    }
}

/// Document pipeline: rasterise, one extraction call per page, aggregate,
/// write.
async fn process_document(
    config: &BatchConfig,
    model: &dyn VisionModel,
    file: &ScannedFile,
) -> ItemOutcome {
    let name = file.name();
    info!("Processing PDF: {}...", name);

    let rendered = match render::render_document(&file.path, config.dpi).await {
        Ok(rendered) => rendered,
        Err(e) => {
            warn!("{}", e);
            return skipped(e.to_string());
        }
    };
    info!("Found {} page(s).", rendered.total_pages);

    let prompt = config.page_prompt.as_deref().unwrap_or(prompts::PAGE_PROMPT);
    let timeout = Duration::from_secs(config.page_timeout_secs);
    let total = rendered.total_pages;

    let mut pages = Vec::with_capacity(rendered.pages.len());
    for page in rendered.pages {
        let outcome = match page.png {
            Ok(png) => {
                info!("Processing page {}/{} of {}...", page.number, total, name);
                if let Some(progress) = &config.progress {
                    progress.on_page(&name, page.number, total);
                }
                let label = format!("page {}/{} of {}", page.number, total, name);
                let payload = ImagePayload::new(png, PAGE_MIME_TYPE);
                match extract::extract_text(model, prompt, &payload, Some(timeout), &label).await {
                    Extraction::Text(text) => PageOutcome::Text(text),
                    Extraction::Absent(reason) => {
                        warn!(
                            "Skipping text from page {} due to extraction issues: {}",
                            page.number, reason
                        );
                        PageOutcome::ExtractionFailed
                    }
                }
            }
            // The renderer already logged the failure detail.
            Err(_) => PageOutcome::ProcessingFailed,
        };
        pages.push(PageText {
            number: page.number,
            outcome,
        });
    }

    match assemble_document(&pages) {
        Some(text) => write_output(config, &file.path, &text).await,
        None => {
            warn!("No text could be extracted from any page of {}.", name);
            skipped("no text extracted from any page")
        }
    }
}

/// Write the final text to `<output_dir>/<base_name>.txt`.
///
/// Uses a temp-file-then-rename so an existing output is replaced whole,
/// never left half-written. A write failure skips the item, not the run.
async fn write_output(config: &BatchConfig, input_path: &Path, text: &str) -> ItemOutcome {
    let output_path = output_path_for(&config.output_dir, input_path);

    match write_atomic(&output_path, text).await {
        Ok(()) => {
            info!("Successfully saved text to {}", output_path.display());
            ItemOutcome::Processed {
                output: output_path,
            }
        }
        Err(e) => {
            warn!("Error writing output file {}: {}", output_path.display(), e);
            skipped(format!("output write failure: {e}"))
        }
    }
}

/// Derive the output path: input base name with the extension replaced.
fn output_path_for(output_dir: &Path, input_path: &Path) -> PathBuf {
    let base = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output_dir.join(format!("{base}.txt"))
}

async fn write_atomic(path: &Path, text: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("txt.tmp");
    tokio::fs::write(&tmp, text).await?;
    tokio::fs::rename(&tmp, path).await
}

fn skipped(reason: impl Into<String>) -> ItemOutcome {
    ItemOutcome::Skipped {
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_replaces_extension_with_txt() {
        assert_eq!(
            output_path_for(Path::new("Output"), Path::new("Input/note.png")),
            PathBuf::from("Output/note.txt")
        );
        assert_eq!(
            output_path_for(Path::new("Output"), Path::new("Input/scan.pdf")),
            PathBuf::from("Output/scan.txt")
        );
        // Dotted base names lose only the final extension.
        assert_eq!(
            output_path_for(Path::new("out"), Path::new("in/report.v2.pdf")),
            PathBuf::from("out/report.v2.txt")
        );
    }

    #[tokio::test]
    async fn write_atomic_replaces_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        write_atomic(&path, "first").await.unwrap();
        write_atomic(&path, "second").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        // No stray temp file left behind.
        assert!(!dir.path().join("note.txt.tmp").exists());
    }
}
