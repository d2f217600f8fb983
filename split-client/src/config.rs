//! Immutable caller configuration, with environment-variable overrides.

use crate::backoff::RetryPolicy;
use crate::error::ConfigError;
use std::path::PathBuf;
use std::time::Duration;

/// Relay endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/v1/messages";

/// Model identifier used when nothing else is configured.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";

/// Deadline for one logical call when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Vendor API base URL for the direct strategy.
pub const DEFAULT_API_BASE_URL: &str = "https://api.anthropic.com";

/// Overrides the relay endpoint.
pub const ENDPOINT_ENV_VAR: &str = "GO_SPLIT_ENDPOINT";
/// Overrides the model identifier.
pub const MODEL_ENV_VAR: &str = "GO_SPLIT_MODEL";
/// Enables exchange capture into the named directory.
pub const CAPTURE_ENV_VAR: &str = "GO_SPLIT_CAPTURE";
/// Overrides the call deadline, in whole seconds.
pub const TIMEOUT_ENV_VAR: &str = "GO_SPLIT_TIMEOUT_SECS";
/// Vendor API key; when present the direct strategy is used.
pub const API_KEY_ENV_VAR: &str = "ANTHROPIC_API_KEY";
/// Overrides the vendor API base URL.
pub const API_BASE_URL_ENV_VAR: &str = "ANTHROPIC_BASE_URL";

/// Configuration for a [`ResilientCaller`](crate::ResilientCaller).
///
/// Built once and passed by value into the caller's constructor; the caller
/// never mutates it. The transport strategy follows from `api_key`: with a
/// key the vendor API is called directly, without one the relay endpoint is
/// used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Relay endpoint URL (relayed strategy).
    pub endpoint: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Deadline for one logical call, covering every attempt and backoff wait.
    pub timeout: Duration,
    /// Vendor API key. `Some` selects the direct strategy.
    pub api_key: Option<String>,
    /// Vendor API base URL (direct strategy).
    pub api_base_url: String,
    /// Directory for captured exchanges. `None` disables capture.
    pub capture_dir: Option<PathBuf>,
    /// Retry bounds and backoff schedule.
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            api_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            capture_dir: None,
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new `ClientConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with the `GO_SPLIT_*` and `ANTHROPIC_*` environment
    /// variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`. Empty values are ignored,
    /// as is a timeout that is not a positive whole number of seconds.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(endpoint) = get(ENDPOINT_ENV_VAR) {
            config.endpoint = endpoint;
        }
        if let Some(model) = get(MODEL_ENV_VAR) {
            config.model = model;
        }
        if let Some(dir) = get(CAPTURE_ENV_VAR) {
            config.capture_dir = Some(PathBuf::from(dir));
        }
        if let Some(secs) = get(TIMEOUT_ENV_VAR) {
            match secs.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => tracing::warn!(
                    event = "config_timeout_ignored",
                    value = %secs,
                    "ignoring {TIMEOUT_ENV_VAR}: expected a positive number of seconds"
                ),
            }
        }
        config.api_key = get(API_KEY_ENV_VAR);
        if let Some(base) = get(API_BASE_URL_ENV_VAR) {
            config.api_base_url = base;
        }
        config
    }

    /// Sets the relay endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the per-call deadline.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the vendor API key, selecting the direct strategy.
    ///
    /// An empty key falls back to `ANTHROPIC_API_KEY`; if that is unset too
    /// the relayed strategy stays selected.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.api_key = if key.trim().is_empty() {
            std::env::var(API_KEY_ENV_VAR)
                .ok()
                .filter(|k| !k.trim().is_empty())
        } else {
            Some(key)
        };
        self
    }

    /// Sets the vendor API base URL.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Enables exchange capture into `dir`.
    #[must_use]
    pub fn with_capture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.capture_dir = Some(dir.into());
        self
    }

    /// Replaces the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Whether this configuration selects the direct strategy.
    #[must_use]
    pub const fn is_direct(&self) -> bool {
        self.api_key.is_some()
    }

    /// Checks the values a caller cannot work without.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }
        let url = if self.is_direct() {
            &self.api_base_url
        } else {
            &self.endpoint
        };
        reqwest::Url::parse(url).map_err(|e| ConfigError::InvalidUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}
