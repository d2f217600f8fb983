//! Relayed strategy: JSON POST to a local messages relay.

use super::wire::{decode_success, MessagesRequest};
use super::Transport;
use crate::classify::failure_from_status;
use crate::error::Failure;
use crate::prompt::Prompt;
use async_trait::async_trait;

/// Posts `{model, max_tokens, messages}` to a relay endpoint.
///
/// Status mapping: 429 is rate limiting, 5xx a server error, any other
/// non-2xx a client error. Connection errors and transport timeouts before a
/// response count as network failures.
#[derive(Debug, Clone)]
pub struct RelayTransport {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

impl RelayTransport {
    /// Creates a relay transport over a shared HTTP client.
    #[must_use]
    pub const fn new(http: reqwest::Client, endpoint: String, model: String) -> Self {
        Self {
            http,
            endpoint,
            model,
        }
    }

    /// The relay URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for RelayTransport {
    async fn attempt(&self, prompt: &Prompt) -> Result<String, Failure> {
        let request = MessagesRequest::for_prompt(&self.model, prompt);

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| Failure::Network(format!("http request: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Failure::Network(format!("read response: {e}")))?;

        if !status.is_success() {
            return Err(failure_from_status(status.as_u16(), &body));
        }

        decode_success(&body)
    }

    fn name(&self) -> &'static str {
        "relay"
    }
}
