//! The remote vision-model seam and its HTTP implementation.
//!
//! The batch driver only ever talks to [`VisionModel`] — a single logical
//! operation, "generate content for a prompt plus one image". Production
//! code uses [`GeminiClient`]; tests substitute a deterministic fake, so no
//! test ever needs network access.
//!
//! The trait returns the *typed response*, not interpreted text: deciding
//! what a response means (blocked, empty, usable) is the Extraction Call's
//! job in [`crate::extract`], and keeping interpretation out of the client
//! means a fake can exercise every response shape the interpreter handles.

use crate::error::{BatchError, ModelError};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Binary content of one image plus its MIME type.
///
/// Invariant: `mime_type` is always one of the supported image MIME types —
/// items whose type cannot be determined are skipped before any payload is
/// built.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImagePayload {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }
}

/// The single remote operation this crate depends on.
///
/// `timeout` bounds the whole round-trip when given; `None` leaves the HTTP
/// client's default in place. Implementations must not retry — the caller
/// makes exactly one attempt per item.
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        image: &ImagePayload,
        timeout: Option<Duration>,
    ) -> Result<ModelResponse, ModelError>;
}

// ── Response schema ──────────────────────────────────────────────────────

/// Typed `generateContent` response.
///
/// Every field is optional-with-default: the service omits `candidates`
/// entirely when generation was blocked, and simplified shapes omit parts.
/// Absent fields must deserialize cleanly rather than error, because a
/// missing candidate list is a *meaningful* outcome, not a decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Safety/blocking feedback, logged verbatim when no candidates came back.
    #[serde(default)]
    pub prompt_feedback: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

impl ModelResponse {
    /// Text of the first part of the first candidate, if present.
    pub fn first_part_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }

    /// All text parts of every candidate joined in order.
    ///
    /// Fallback accessor for simplified response shapes where the first part
    /// carries no text. Returns `None` only when no part anywhere has a text
    /// field — an empty string is a present (and valid) result.
    pub fn flattened_text(&self) -> Option<String> {
        let pieces: Vec<&str> = self
            .candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect();
        if pieces.is_empty() {
            None
        } else {
            Some(pieces.concat())
        }
    }

    /// Convenience constructor used by tests and fakes: one candidate with
    /// one text part.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(Content {
                    parts: vec![Part {
                        text: Some(text.into()),
                    }],
                }),
                finish_reason: None,
            }],
            prompt_feedback: None,
        }
    }
}

// ── Request schema ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

/// One ordered part of the request: the prompt text, then the inline image.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text { text: &'a str },
    Inline { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

// ── Gemini client ────────────────────────────────────────────────────────

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable carrying the API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// `generateContent` client over reqwest.
///
/// The client itself carries no default timeout; per-call bounds are passed
/// through [`VisionModel::generate`] so document pages can be bounded while
/// single images keep the transport default.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Construct a client for the given key and model id.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, BatchError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| BatchError::ClientConstruction {
                reason: e.to_string(),
            })?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Construct a client reading the key from `GEMINI_API_KEY`.
    pub fn from_env(model: impl Into<String>) -> Result<Self, BatchError> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or(BatchError::ApiKeyMissing { var: API_KEY_VAR })?;
        Self::new(api_key, model)
    }

    /// Override the endpoint base URL (local proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Model id this client addresses.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl VisionModel for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        image: &ImagePayload,
        timeout: Option<Duration>,
    ) -> Result<ModelResponse, ModelError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::Text { text: prompt },
                    RequestPart::Inline {
                        inline_data: InlineData {
                            mime_type: image.mime_type.clone(),
                            data: STANDARD.encode(&image.bytes),
                        },
                    },
                ],
            }],
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!("POST {} ({} image bytes)", url, image.bytes.len());

        let mut builder = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request);
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ModelError::Timeout {
                    secs: timeout.map(|t| t.as_secs()).unwrap_or(0),
                }
            } else {
                ModelError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(ModelError::RateLimited);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ModelError::Api {
                status: status.as_u16(),
                message: truncate_message(&message),
            });
        }

        response
            .json::<ModelResponse>()
            .await
            .map_err(|e| ModelError::Decode(e.to_string()))
    }
}

/// Keep API error bodies to one log-friendly line.
fn truncate_message(message: &str) -> String {
    let flat = message.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.len() > 300 {
        let mut end = 300;
        while !flat.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}\u{2026}", &flat[..end])
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_deserialises_full_shape() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "  Hello World "}], "role": "model"},
                 "finishReason": "STOP"}
            ]
        }"#;
        let response: ModelResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.first_part_text(), Some("  Hello World "));
        assert_eq!(
            response.candidates[0].finish_reason.as_deref(),
            Some("STOP")
        );
    }

    #[test]
    fn response_with_no_candidates_deserialises() {
        let json = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let response: ModelResponse = serde_json::from_str(json).unwrap();
        assert!(response.candidates.is_empty());
        assert!(response.prompt_feedback.is_some());
    }

    #[test]
    fn empty_body_deserialises_to_default() {
        let response: ModelResponse = serde_json::from_str("{}").unwrap();
        assert!(response.candidates.is_empty());
        assert!(response.first_part_text().is_none());
        assert!(response.flattened_text().is_none());
    }

    #[test]
    fn flattened_text_joins_all_parts() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"inlineData": {}}, {"text": "Hello "}, {"text": "World"}]}}
            ]
        }"#;
        let response: ModelResponse = serde_json::from_str(json).unwrap();
        // First part carries no text, so the primary accessor yields nothing…
        assert_eq!(response.first_part_text(), None);
        // …and the flattened fallback recovers the rest.
        assert_eq!(response.flattened_text().as_deref(), Some("Hello World"));
    }

    #[test]
    fn empty_text_part_is_present_not_absent() {
        let response = ModelResponse::with_text("");
        assert_eq!(response.first_part_text(), Some(""));
    }

    #[test]
    fn request_serialises_ordered_parts() {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::Text { text: "read this" },
                    RequestPart::Inline {
                        inline_data: InlineData {
                            mime_type: "image/png".into(),
                            data: "AAAA".into(),
                        },
                    },
                ],
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        let parts = &value["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "read this");
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");
        assert_eq!(parts[1]["inline_data"]["data"], "AAAA");
    }

    #[test]
    fn truncate_message_flattens_and_bounds() {
        let long = "x".repeat(500);
        let t = truncate_message(&long);
        assert!(t.len() <= 303);
        assert!(t.ends_with('\u{2026}'));

        let multiline = "bad\n  request\n";
        assert_eq!(truncate_message(multiline), "bad request");
    }
}
