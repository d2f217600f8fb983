//! Direct strategy: the vendor Messages API, authenticated with an API key.

use super::wire::{decode_success, MessagesRequest, MessagesResponse};
use super::Transport;
use crate::classify::failure_from_status;
use crate::error::Failure;
use crate::prompt::Prompt;
use async_trait::async_trait;
use std::fmt;

/// Messages API version header value.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Path of the Messages API below the base URL.
const MESSAGES_PATH: &str = "/v1/messages";

/// Calls `POST {base}/v1/messages` with `x-api-key` authentication.
///
/// Status mapping follows the relay (429 rate limited, 5xx server error,
/// other non-2xx client error), but a client-side timeout is reported as
/// [`Failure::Cancelled`] rather than a network failure.
#[derive(Clone)]
pub struct DirectTransport {
    http: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
}

impl fmt::Debug for DirectTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectTransport")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl DirectTransport {
    /// Creates a direct transport over a shared HTTP client.
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: &str, api_key: String, model: String) -> Self {
        Self {
            http,
            url: format!("{}{MESSAGES_PATH}", base_url.trim_end_matches('/')),
            api_key,
            model,
        }
    }

    /// Full Messages API URL requests are sent to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Prefers the vendor's `error.message` over the raw body when present.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<MessagesResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .map(|e| match e.kind {
            Some(kind) => format!("{kind}: {}", e.message),
            None => e.message,
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string())
}

fn transport_failure(stage: &str, err: &reqwest::Error) -> Failure {
    if err.is_timeout() {
        Failure::Cancelled(format!("{stage}: {err}"))
    } else {
        Failure::Network(format!("{stage}: {err}"))
    }
}

#[async_trait]
impl Transport for DirectTransport {
    async fn attempt(&self, prompt: &Prompt) -> Result<String, Failure> {
        let request = MessagesRequest::for_prompt(&self.model, prompt);

        let response = self
            .http
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_failure("http request", &e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_failure("read response", &e))?;

        if !status.is_success() {
            return Err(failure_from_status(status.as_u16(), &error_detail(&body)));
        }

        decode_success(&body)
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}
