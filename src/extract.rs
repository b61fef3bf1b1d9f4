//! The Extraction Call: one prompt + one image in, text or a typed absence out.
//!
//! This is the error boundary for everything remote. Whatever happens during
//! the call — safety block, odd response shape, timeout, rate limit, decode
//! failure — the caller receives an [`Extraction`], never an `Err`, so the
//! batch loop cannot be halted by a single bad item. Exactly one attempt is
//! made per item; there is no retry or backoff.
//!
//! Response interpretation follows a strict priority order:
//!
//! 1. no candidates                → [`AbsenceReason::BlockedOrEmpty`]
//! 2. first part of first candidate → trimmed text (empty string is success)
//! 3. flattened text accessor       → trimmed text (simplified shapes)
//! 4. anything else                 → [`AbsenceReason::UnparseableResponse`]

use crate::error::{AbsenceReason, ModelError};
use crate::model::{ImagePayload, ModelResponse, VisionModel};
use std::time::Duration;
use tracing::{debug, warn};

/// Result of one Extraction Call.
///
/// `Text("")` is a valid, successful result — the model saw the image and
/// found nothing to transcribe. Absence means no result was obtained at all,
/// and carries the reason.
#[derive(Debug)]
pub enum Extraction {
    Text(String),
    Absent(AbsenceReason),
}

impl Extraction {
    pub fn is_text(&self) -> bool {
        matches!(self, Extraction::Text(_))
    }
}

/// Invoke the model once and interpret the outcome.
///
/// `label` names the item in log lines ("note.png", "page 3/7 of scan.pdf").
pub async fn extract_text(
    model: &dyn VisionModel,
    prompt: &str,
    image: &ImagePayload,
    timeout: Option<Duration>,
    label: &str,
) -> Extraction {
    match model.generate(prompt, image, timeout).await {
        Ok(response) => interpret(response, label),
        Err(e) => {
            match &e {
                ModelError::Timeout { .. } => {
                    warn!("API error (timeout) processing {}: {}", label, e)
                }
                ModelError::RateLimited => {
                    warn!("API error (rate limit) processing {}: {}", label, e)
                }
                ModelError::Api { .. } | ModelError::Network(_) => {
                    warn!("API error processing {}: {}", label, e)
                }
                ModelError::Decode(_) => {
                    warn!("Error parsing response for {}: {}", label, e)
                }
            }
            match e {
                ModelError::Decode(_) => Extraction::Absent(AbsenceReason::UnparseableResponse),
                transport => Extraction::Absent(AbsenceReason::Transport(transport)),
            }
        }
    }
}

/// Map a typed response to text-or-absence in priority order.
pub fn interpret(response: ModelResponse, label: &str) -> Extraction {
    if response.candidates.is_empty() {
        warn!(
            "No content generated for {}, possibly due to safety filters or other issues",
            label
        );
        match &response.prompt_feedback {
            Some(feedback) => warn!("Prompt feedback: {}", feedback),
            None => debug!("(no detailed prompt feedback available)"),
        }
        return Extraction::Absent(AbsenceReason::BlockedOrEmpty);
    }

    if let Some(text) = response.first_part_text() {
        return Extraction::Text(text.trim().to_string());
    }

    if let Some(text) = response.flattened_text() {
        debug!("Text recovered through flattened accessor for {}", label);
        return Extraction::Text(text.trim().to_string());
    }

    debug!(
        "Unusable response candidate for {}: {:?}",
        label,
        response.candidates.first()
    );
    Extraction::Absent(AbsenceReason::UnparseableResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Candidate, Content, Part};

    #[test]
    fn zero_candidates_is_blocked_or_empty() {
        let out = interpret(ModelResponse::default(), "test.png");
        assert!(matches!(
            out,
            Extraction::Absent(AbsenceReason::BlockedOrEmpty)
        ));
    }

    #[test]
    fn first_part_text_is_trimmed() {
        let out = interpret(ModelResponse::with_text("  Hello World \n"), "test.png");
        match out {
            Extraction::Text(t) => assert_eq!(t, "Hello World"),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn empty_trimmed_text_is_still_success() {
        let out = interpret(ModelResponse::with_text("   \n "), "blank.png");
        match out {
            Extraction::Text(t) => assert_eq!(t, ""),
            other => panic!("expected empty text success, got {other:?}"),
        }
    }

    #[test]
    fn flattened_fallback_applies_when_first_part_has_no_text() {
        let response = ModelResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    parts: vec![
                        Part { text: None },
                        Part {
                            text: Some(" fallback text ".into()),
                        },
                    ],
                }),
                finish_reason: None,
            }],
            prompt_feedback: None,
        };
        match interpret(response, "test.png") {
            Extraction::Text(t) => assert_eq!(t, "fallback text"),
            other => panic!("expected fallback text, got {other:?}"),
        }
    }

    #[test]
    fn candidate_without_any_text_is_unparseable() {
        let response = ModelResponse {
            candidates: vec![Candidate {
                content: Some(Content { parts: vec![] }),
                finish_reason: Some("STOP".into()),
            }],
            prompt_feedback: None,
        };
        assert!(matches!(
            interpret(response, "test.png"),
            Extraction::Absent(AbsenceReason::UnparseableResponse)
        ));
    }
}
