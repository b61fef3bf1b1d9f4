//! Configuration for a batch extraction run.
//!
//! All run behaviour is controlled through [`BatchConfig`], built via its
//! [`BatchConfigBuilder`]. The original tool hard-coded its folder names,
//! model id, and prompts as module-level constants; keeping every knob in one
//! struct instead lets tests point the driver at temporary directories and a
//! fake model without touching any global state.
//!
//! # Design choice: builder over constructor
//! A constructor with a half-dozen positional arguments breaks on every new
//! field. The builder lets callers set only what they care about and rely on
//! documented defaults for the rest.

use crate::error::BatchError;
use crate::progress::BatchProgress;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for one batch run over an input directory.
///
/// Built via [`BatchConfig::builder()`] or using [`BatchConfig::default()`].
///
/// # Example
/// ```rust
/// use pixtext::BatchConfig;
///
/// let config = BatchConfig::builder()
///     .input_dir("Input")
///     .output_dir("Output")
///     .model("gemini-2.0-flash")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// Directory scanned for input files. Must exist before the run starts.
    /// Default: `Input`.
    pub input_dir: PathBuf,

    /// Directory receiving one `.txt` file per input. Created when absent.
    /// Default: `Output`.
    pub output_dir: PathBuf,

    /// Remote model identifier sent in the request path. Default:
    /// `gemini-2.0-flash`.
    pub model: String,

    /// Rendering DPI used when rasterising each PDF page. Range: 72–400.
    /// Default: 150.
    ///
    /// 150 DPI is the sweet spot: text is sharp enough for a vision model to
    /// read reliably, while the PNG payload stays well below typical API
    /// upload limits. Increase to 200–300 for small-font scans.
    pub dpi: u32,

    /// Per-call timeout in seconds for document pages. Default: 120.
    ///
    /// Handwriting-heavy pages can take the model a long while. Single-image
    /// calls deliberately use the HTTP client's default instead of this
    /// value; only document pages are bounded.
    pub page_timeout_secs: u64,

    /// Extraction prompt for single images. If `None`, uses
    /// [`crate::prompts::IMAGE_PROMPT`].
    pub image_prompt: Option<String>,

    /// Extraction prompt for rasterised document pages. If `None`, uses
    /// [`crate::prompts::PAGE_PROMPT`].
    pub page_prompt: Option<String>,

    /// Optional per-item progress sink. Default: none.
    pub progress: Option<Arc<dyn BatchProgress>>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("Input"),
            output_dir: PathBuf::from("Output"),
            model: "gemini-2.0-flash".to_string(),
            dpi: 150,
            page_timeout_secs: 120,
            image_prompt: None,
            page_prompt: None,
            progress: None,
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("input_dir", &self.input_dir)
            .field("output_dir", &self.output_dir)
            .field("model", &self.model)
            .field("dpi", &self.dpi)
            .field("page_timeout_secs", &self.page_timeout_secs)
            .field("image_prompt", &self.image_prompt)
            .field("page_prompt", &self.page_prompt)
            .field("progress", &self.progress.as_ref().map(|_| "<dyn BatchProgress>"))
            .finish()
    }
}

impl BatchConfig {
    /// Create a new builder for `BatchConfig`.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`BatchConfig`].
#[derive(Debug)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = dir.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 400);
        self
    }

    pub fn page_timeout_secs(mut self, secs: u64) -> Self {
        self.config.page_timeout_secs = secs.max(1);
        self
    }

    pub fn image_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.image_prompt = Some(prompt.into());
        self
    }

    pub fn page_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.page_prompt = Some(prompt.into());
        self
    }

    pub fn progress(mut self, sink: Arc<dyn BatchProgress>) -> Self {
        self.config.progress = Some(sink);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BatchConfig, BatchError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 400 {
            return Err(BatchError::InvalidConfig(format!(
                "DPI must be 72–400, got {}",
                c.dpi
            )));
        }
        if c.model.is_empty() {
            return Err(BatchError::InvalidConfig("Model id must not be empty".into()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = BatchConfig::default();
        assert_eq!(c.input_dir, PathBuf::from("Input"));
        assert_eq!(c.output_dir, PathBuf::from("Output"));
        assert_eq!(c.model, "gemini-2.0-flash");
        assert_eq!(c.dpi, 150);
        assert_eq!(c.page_timeout_secs, 120);
        assert!(c.image_prompt.is_none());
        assert!(c.page_prompt.is_none());
    }

    #[test]
    fn builder_clamps_dpi() {
        let c = BatchConfig::builder().dpi(9999).build().unwrap();
        assert_eq!(c.dpi, 400);
        let c = BatchConfig::builder().dpi(10).build().unwrap();
        assert_eq!(c.dpi, 72);
    }

    #[test]
    fn builder_rejects_empty_model() {
        let err = BatchConfig::builder().model("").build().unwrap_err();
        assert!(matches!(err, BatchError::InvalidConfig(_)));
    }

    #[test]
    fn builder_sets_directories() {
        let c = BatchConfig::builder()
            .input_dir("/tmp/in")
            .output_dir("/tmp/out")
            .build()
            .unwrap();
        assert_eq!(c.input_dir, PathBuf::from("/tmp/in"));
        assert_eq!(c.output_dir, PathBuf::from("/tmp/out"));
    }
}
