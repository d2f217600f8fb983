//! Messages wire format shared by the relay and the vendor API.

use crate::error::Failure;
use crate::prompt::Prompt;
use serde::{Deserialize, Serialize};

/// Request body: `{"model", "max_tokens", "messages": [{"role", "content"}]}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessagesRequest {
    /// Model identifier.
    pub model: String,
    /// Output token budget.
    pub max_tokens: u32,
    /// Conversation; always a single user message here.
    pub messages: Vec<Message>,
}

impl MessagesRequest {
    /// Builds the single-user-message request for `prompt`.
    #[must_use]
    pub fn for_prompt(model: &str, prompt: &Prompt) -> Self {
        Self {
            model: model.to_string(),
            max_tokens: prompt.max_tokens(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.text().to_string(),
            }],
        }
    }
}

/// One conversation message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Speaker role (`"user"`).
    pub role: String,
    /// Message text.
    pub content: String,
}

/// Response body: `{"content": [{"type", "text"}], "error"?: {"message"}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessagesResponse {
    /// Content blocks, first one carries the answer.
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    /// Service-reported error, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// One block of response content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentBlock {
    /// Block type; only `"text"` blocks are accepted.
    #[serde(rename = "type")]
    pub kind: String,
    /// Block text. Absent for non-text blocks.
    #[serde(default)]
    pub text: String,
}

impl ContentBlock {
    /// A `"text"` block.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
        }
    }
}

/// Error object embedded in a response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    /// Vendor error category, e.g. `rate_limit_error`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}

impl MessagesResponse {
    /// Extracts the answer text from a successful response.
    ///
    /// # Errors
    ///
    /// Returns [`Failure::Protocol`] when the body carries an error object,
    /// has no content blocks, or its first block is not text.
    pub fn into_text(self) -> Result<String, Failure> {
        if let Some(error) = self.error {
            return Err(Failure::Protocol(format!("API error: {}", error.message)));
        }
        let Some(first) = self.content.into_iter().next() else {
            return Err(Failure::Protocol("empty response: no content blocks".to_string()));
        };
        if first.kind != "text" {
            return Err(Failure::Protocol(format!(
                "not a text block (type={})",
                first.kind
            )));
        }
        Ok(first.text)
    }
}

/// Decodes a 2xx response body and extracts its text.
///
/// # Errors
///
/// Returns [`Failure::Protocol`] when the body is not a messages response or
/// fails [`MessagesResponse::into_text`].
pub fn decode_success(body: &str) -> Result<String, Failure> {
    let response: MessagesResponse = serde_json::from_str(body)
        .map_err(|e| Failure::Protocol(format!("parse response: {e}")))?;
    response.into_text()
}
