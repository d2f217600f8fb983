//! Transport strategies: one network attempt against a model endpoint.
//!
//! - [`RelayTransport`] posts the messages request to a local relay.
//! - [`DirectTransport`] calls the vendor Messages API with an API key.
//!
//! [`Strategy`] selects one of the two at construction time; the
//! [`ResilientCaller`](crate::ResilientCaller) only sees the [`Transport`]
//! capability.

pub mod direct;
pub mod relay;
pub mod wire;

pub use direct::DirectTransport;
pub use relay::RelayTransport;

use crate::config::ClientConfig;
use crate::error::{ConfigError, Failure};
use crate::prompt::Prompt;
use async_trait::async_trait;
use std::time::Duration;

/// Connect timeout for the shared HTTP client. The call deadline bounds the
/// rest of the request.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Performs exactly one attempt: no retries, no sleeping.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `prompt` once and returns the answer text or a classified failure.
    async fn attempt(&self, prompt: &Prompt) -> Result<String, Failure>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// The transport chosen for a caller. Fixed for the caller's lifetime.
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Local relay endpoint.
    Relay(RelayTransport),
    /// Vendor API with an API key.
    Direct(DirectTransport),
}

impl Strategy {
    /// Picks the strategy for `config`: direct when an API key is set,
    /// relayed otherwise. Builds the HTTP client shared by every attempt.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.timeout)
            .build()?;

        Ok(match &config.api_key {
            Some(key) => Self::Direct(DirectTransport::new(
                http,
                &config.api_base_url,
                key.clone(),
                config.model.clone(),
            )),
            None => Self::Relay(RelayTransport::new(
                http,
                config.endpoint.clone(),
                config.model.clone(),
            )),
        })
    }

    /// Whether this is the direct vendor strategy.
    #[must_use]
    pub const fn is_direct(&self) -> bool {
        matches!(self, Self::Direct(_))
    }
}

#[async_trait]
impl Transport for Strategy {
    async fn attempt(&self, prompt: &Prompt) -> Result<String, Failure> {
        match self {
            Self::Relay(relay) => relay.attempt(prompt).await,
            Self::Direct(direct) => direct.attempt(prompt).await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Relay(relay) => relay.name(),
            Self::Direct(direct) => direct.name(),
        }
    }
}
