//! CLI binary for pixtext.
//!
//! A thin shim over the library crate. The tool takes no arguments:
//! behaviour is controlled entirely by the environment (the API key and an
//! optional model override) and the fixed `Input/` and `Output/` directory
//! names, so `--help` and `--version` are the only accepted flags.

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pixtext::{run, BatchConfig, BatchProgress, GeminiClient};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress rendering using indicatif ───────────────────────────────────

/// Terminal progress: a batch-level bar plus one printed line per file.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_scan_complete

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_prefix("Scanning");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl BatchProgress for CliProgress {
    fn on_scan_complete(&self, total_files: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} files  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_files as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Extracting");
    }

    fn on_file_start(&self, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn on_page(&self, name: &str, page: usize, total_pages: usize) {
        self.bar
            .set_message(format!("{name} — page {page}/{total_pages}"));
    }

    fn on_file_processed(&self, name: &str, output: &Path) {
        self.bar.println(format!(
            "  {} {}  {}",
            green("✓"),
            name,
            dim(&format!("→ {}", output.display())),
        ));
        self.bar.inc(1);
    }

    fn on_file_skipped(&self, name: &str, reason: &str) {
        // Truncate very long reasons to keep output tidy.
        let msg = if reason.len() > 80 {
            let mut end = 79;
            while !reason.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}\u{2026}", &reason[..end])
        } else {
            reason.to_string()
        };

        self.bar
            .println(format!("  {} {}  {}", red("✗"), name, red(&msg)));
        self.bar.inc(1);
    }
}

const AFTER_HELP: &str = r#"BEHAVIOUR:
  pixtext reads every supported file in ./Input and writes one text file per
  input into ./Output (created if absent). There are no flags: the run is
  controlled entirely by the environment and the fixed directory names.

SUPPORTED INPUTS:
  Images      .png .jpg .jpeg .webp .bmp .gif    one extraction call per file
  Documents   .pdf                               one call per page (150 DPI)

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY   Required. API key presented to the vision model service.
  PIXTEXT_MODEL    Optional. Model id override (default: gemini-2.0-flash).

EXIT CODES:
  0   run completed; individual files may still have been skipped
  1   startup failure: missing API key, missing Input/, Output/ not creatable

SETUP:
  1. Set API key:        export GEMINI_API_KEY=...
  2. Add inputs:         mkdir -p Input && cp scan.pdf note.png Input/
  3. Extract:            pixtext
"#;

/// Batch-extract text from images and PDFs in ./Input using a vision model.
#[derive(Parser, Debug)]
#[command(
    name = "pixtext",
    version,
    about = "Batch-extract text from images and PDFs using a remote vision model",
    long_about = "Scan ./Input for images and PDF documents, send each file (or each \
rendered PDF page) to a remote vision model with an extraction prompt, and write the \
returned text to ./Output, one .txt file per input.",
    after_long_help = AFTER_HELP
)]
struct Cli {}

#[tokio::main]
async fn main() -> Result<()> {
    let _cli = Cli::parse();

    // The progress display owns the terminal; keep library logging at warn
    // unless the user overrides via RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    // ── Init: credential before anything touches the filesystem ─────────
    let model_id = std::env::var("PIXTEXT_MODEL")
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| BatchConfig::default().model);
    let client = GeminiClient::from_env(&model_id)?;
    eprintln!("Using model: {}", bold(&model_id));

    let progress = CliProgress::new();
    let config = BatchConfig::builder()
        .model(model_id)
        .progress(Arc::clone(&progress) as Arc<dyn BatchProgress>)
        .build()?;

    // ── Run both pipelines over Input/ ───────────────────────────────────
    let summary = run(&config, Arc::new(client)).await?;
    progress.finish();

    // ── Summary ──────────────────────────────────────────────────────────
    println!("\n--- Processing Complete ---");
    println!(
        "Successfully processed: {} file(s).",
        bold(&summary.processed.to_string())
    );
    println!(
        "Skipped/Errored:        {} file(s).",
        if summary.skipped > 0 {
            red(&summary.skipped.to_string())
        } else {
            summary.skipped.to_string()
        }
    );
    println!(
        "Text files saved in:    '{}'",
        summary.output_dir.display()
    );

    Ok(())
}
