//! Progress-event trait for per-item batch events.
//!
//! Inject an [`Arc<dyn BatchProgress>`] via
//! [`crate::config::BatchConfigBuilder::progress`] to receive events as the
//! driver works through the input directory. The CLI forwards them to a
//! terminal progress display; library embedders can forward them anywhere
//! else without the library knowing how the host application communicates.
//!
//! All methods have default no-op implementations so callers only override
//! what they care about. Processing is strictly sequential, so no method is
//! ever called concurrently; the `Send + Sync` bound exists only because the
//! sink is shared behind an `Arc`.

use std::sync::Arc;

/// Called by the driver as it scans and processes each item.
pub trait BatchProgress: Send + Sync {
    /// Called once after scanning, before any item is processed.
    fn on_scan_complete(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called when work on a file begins.
    fn on_file_start(&self, name: &str) {
        let _ = name;
    }

    /// Called before each document page is sent to the model.
    fn on_page(&self, name: &str, page: usize, total_pages: usize) {
        let _ = (name, page, total_pages);
    }

    /// Called when a file's output was written.
    fn on_file_processed(&self, name: &str, output: &std::path::Path) {
        let _ = (name, output);
    }

    /// Called when a file was skipped, with the one-line reason.
    fn on_file_skipped(&self, name: &str, reason: &str) {
        let _ = (name, reason);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgress;

impl BatchProgress for NoopProgress {}

/// Convenience alias matching the type stored in [`crate::config::BatchConfig`].
pub type ProgressSink = Arc<dyn BatchProgress>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSink {
        processed: AtomicUsize,
        skipped: AtomicUsize,
    }

    impl BatchProgress for CountingSink {
        fn on_file_processed(&self, _name: &str, _output: &Path) {
            self.processed.fetch_add(1, Ordering::SeqCst);
        }

        fn on_file_skipped(&self, _name: &str, _reason: &str) {
            self.skipped.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_sink_does_not_panic() {
        let sink = NoopProgress;
        sink.on_scan_complete(3);
        sink.on_file_start("a.png");
        sink.on_page("b.pdf", 1, 4);
        sink.on_file_processed("a.png", Path::new("Output/a.txt"));
        sink.on_file_skipped("c.gif", "blocked");
    }

    #[test]
    fn counting_sink_receives_events() {
        let sink = CountingSink {
            processed: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
        };
        sink.on_file_processed("a.png", Path::new("Output/a.txt"));
        sink.on_file_skipped("b.png", "transport error");
        sink.on_file_skipped("c.png", "blocked");
        assert_eq!(sink.processed.load(Ordering::SeqCst), 1);
        assert_eq!(sink.skipped.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_sink_works() {
        let sink: ProgressSink = Arc::new(NoopProgress);
        sink.on_scan_complete(10);
        sink.on_file_start("x.pdf");
    }
}
