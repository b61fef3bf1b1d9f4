//! Page aggregation: join per-page outcomes into one document text.
//!
//! Every page contributes a marker line, including pages that failed —
//! the combined output preserves the document's page count even on partial
//! failure, so a reader can see exactly which pages are missing and why.
//! A document where *no* page yielded text at all is treated as failed:
//! error markers alone are not worth writing.

use std::fmt::Write as _;

/// Outcome of one page after rasterisation and extraction.
#[derive(Debug)]
pub enum PageOutcome {
    /// Extraction succeeded; the text may be empty.
    Text(String),
    /// The remote call yielded no text for this page.
    ExtractionFailed,
    /// The page could not be rasterised or encoded.
    ProcessingFailed,
}

/// One page's outcome, tagged with its 1-based page number.
#[derive(Debug)]
pub struct PageText {
    pub number: usize,
    pub outcome: PageOutcome,
}

/// Concatenate page results in order, with page markers.
///
/// Returns `None` when no page yielded any text — every page failed, so
/// there is nothing worth saving. An empty-but-present extraction counts
/// as yielded text: its marker keeps the combined output non-empty, so a
/// document whose only page transcribes to "" is still saved.
pub fn assemble_document(pages: &[PageText]) -> Option<String> {
    let any_text = pages
        .iter()
        .any(|p| matches!(p.outcome, PageOutcome::Text(_)));
    if !any_text {
        return None;
    }

    let mut combined = String::new();
    for page in pages {
        match &page.outcome {
            PageOutcome::Text(text) => {
                let _ = write!(combined, "\n\n--- Page {} ---\n\n{}", page.number, text);
            }
            PageOutcome::ExtractionFailed => {
                let _ = write!(
                    combined,
                    "\n\n--- Page {} (Error extracting text) ---\n\n",
                    page.number
                );
            }
            PageOutcome::ProcessingFailed => {
                let _ = write!(
                    combined,
                    "\n\n--- Page {} (Error processing page) ---\n\n",
                    page.number
                );
            }
        }
    }

    let trimmed = combined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: usize, outcome: PageOutcome) -> PageText {
        PageText { number, outcome }
    }

    #[test]
    fn pages_appear_in_order_with_markers() {
        let text = assemble_document(&[
            page(1, PageOutcome::Text("first".into())),
            page(2, PageOutcome::Text("second".into())),
            page(3, PageOutcome::Text("third".into())),
        ])
        .unwrap();

        let p1 = text.find("--- Page 1 ---").unwrap();
        let p2 = text.find("--- Page 2 ---").unwrap();
        let p3 = text.find("--- Page 3 ---").unwrap();
        assert!(p1 < p2 && p2 < p3);
        assert!(text.contains("--- Page 1 ---\n\nfirst"));
        assert!(text.contains("--- Page 2 ---\n\nsecond"));
        assert!(text.ends_with("third"));
        // Leading separator whitespace is trimmed away.
        assert!(text.starts_with("--- Page 1 ---"));
    }

    #[test]
    fn failed_pages_keep_their_markers() {
        let text = assemble_document(&[
            page(1, PageOutcome::Text("real text".into())),
            page(2, PageOutcome::ProcessingFailed),
            page(3, PageOutcome::ExtractionFailed),
            page(4, PageOutcome::Text("more text".into())),
        ])
        .unwrap();

        assert!(text.contains("--- Page 2 (Error processing page) ---"));
        assert!(text.contains("--- Page 3 (Error extracting text) ---"));
        assert!(text.contains("--- Page 1 ---"));
        assert!(text.contains("--- Page 4 ---"));
    }

    #[test]
    fn document_with_no_successful_page_yields_none() {
        let out = assemble_document(&[
            page(1, PageOutcome::ExtractionFailed),
            page(2, PageOutcome::ProcessingFailed),
        ]);
        assert!(out.is_none());
    }

    #[test]
    fn empty_page_list_yields_none() {
        assert!(assemble_document(&[]).is_none());
    }

    #[test]
    fn single_page_with_empty_text_is_saved() {
        // An empty-but-present extraction still emits its marker, so the
        // combined output is non-empty and the document counts as processed.
        let text = assemble_document(&[page(1, PageOutcome::Text(String::new()))]).unwrap();
        assert_eq!(text, "--- Page 1 ---");
    }
}
