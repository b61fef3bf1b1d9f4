//! Error types for the pixtext library.
//!
//! Three distinct types reflect three distinct failure scopes:
//!
//! * [`BatchError`] — **Fatal**: the run cannot proceed at all (missing
//!   input directory, uncreatable output directory, client construction
//!   failure). Returned as `Err(BatchError)` from [`crate::driver::run`].
//!
//! * [`DocumentError`] — **Item-scoped**: a single PDF could not be opened
//!   (not found, password-protected, corrupt). The document is skipped and
//!   the run continues.
//!
//! * [`AbsenceReason`] — **Why no text was obtained** from one remote call.
//!   Never an `Err` anywhere: the Extraction Call converts every failure at
//!   its boundary into one of these markers so a single bad item can never
//!   halt the batch.
//!
//! The separation lets the driver degrade gracefully: fatal conditions abort
//! before any item is touched, everything else becomes a logged skip.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pixtext library.
///
/// Item- and page-scoped failures use [`DocumentError`] and
/// [`AbsenceReason`] and are handled inside the processing loop rather than
/// propagated here.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The required API key environment variable is not set.
    #[error("{var} environment variable not set.\nPlease set the environment variable and try again.")]
    ApiKeyMissing { var: &'static str },

    /// The input directory does not exist.
    #[error("Input directory '{path}' not found.\nPlease create it and place your files inside.")]
    InputDirMissing { path: PathBuf },

    /// The input directory exists but could not be read.
    #[error("Failed to read input directory '{path}': {source}")]
    InputDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output directory was absent and could not be created.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client backing the vision model could not be constructed.
    #[error("Failed to initialise the vision model client: {reason}")]
    ClientConstruction { reason: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Transport- and protocol-level failures from one remote model call.
///
/// Every variant is caught at the Extraction Call boundary and folded into
/// [`AbsenceReason::Transport`] (or [`AbsenceReason::UnparseableResponse`]
/// for [`ModelError::Decode`]); callers of the library never see these as
/// errors. The variants exist so the log line names the specific kind —
/// a timeout reads differently from a rate limit.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The request exceeded its timeout.
    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// HTTP 429 — the API asked us to back off. No retry is made; the item
    /// is skipped.
    #[error("rate limit exceeded (HTTP 429)")]
    RateLimited,

    /// Any other non-success HTTP status.
    #[error("API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The request never completed (DNS, connection, TLS, ...).
    #[error("network error: {0}")]
    Network(String),

    /// The response body was not valid JSON for the expected schema.
    #[error("malformed response body: {0}")]
    Decode(String),
}

/// Why a remote call produced no text.
///
/// A typed "no result" outcome, distinct from a successful empty string.
/// Carried in [`crate::extract::Extraction::Absent`].
#[derive(Debug, Error)]
pub enum AbsenceReason {
    /// The response carried no candidates at all, typically a safety block.
    #[error("no content generated (blocked or empty response)")]
    BlockedOrEmpty,

    /// The response had candidates but no usable text part anywhere.
    #[error("no text part found in the response structure")]
    UnparseableResponse,

    /// The call failed at the transport level; the inner error names the kind.
    #[error("transport error: {0}")]
    Transport(#[source] ModelError),

    /// Anything unexpected inside the call boundary.
    #[error("unexpected error: {0}")]
    Internal(String),
}

/// Outcomes of opening a PDF document.
///
/// All three skip the whole document, no partial processing.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The file vanished between scanning and opening.
    #[error("document not found: '{path}'")]
    NotFound { path: PathBuf },

    /// The document requires a password; encrypted inputs are not supported.
    #[error("document '{path}' is password-protected; skipping")]
    PasswordProtected { path: PathBuf },

    /// Any other open failure.
    #[error("document '{path}' could not be opened: {detail}")]
    Malformed { path: PathBuf, detail: String },
}
