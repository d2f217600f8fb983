//! Resilient LLM call layer for go-split.
//!
//! A [`ResilientCaller`] sends a [`Prompt`] through one of two transport
//! strategies, chosen once from the [`ClientConfig`]:
//!
//! - **relayed** (default): JSON POST to a local messages relay;
//! - **direct**: the vendor Messages API, when an API key is configured.
//!
//! Transient failures (network errors, HTTP 429, HTTP 5xx) are retried with
//! exponential backoff, up to four attempts, all under a single deadline.
//! Successful exchanges can be captured to disk for offline inspection.
//!
//! ```no_run
//! # use split_client::{ClientConfig, ResilientCaller};
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let caller = ResilientCaller::new(ClientConfig::from_env())?;
//! let answer = caller.call("Return a JSON array of filenames.", 500).await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

/// Retry policy and backoff schedule.
pub mod backoff;
/// The retry loop.
pub mod caller;
/// Failure classification.
pub mod classify;
/// Caller configuration.
pub mod config;
/// Error types.
pub mod error;
/// Prompt value type.
pub mod prompt;
/// Exchange capture.
pub mod recorder;
/// Relayed and direct transport strategies.
pub mod transport;

pub use backoff::RetryPolicy;
pub use caller::{CallMetrics, ResilientCaller};
pub use classify::{classify, RetryDecision};
pub use config::ClientConfig;
pub use error::{CallError, ConfigError, Failure, FailureKind, RecorderError};
pub use prompt::Prompt;
pub use recorder::{ExchangeRecord, ExchangeRecorder};
pub use transport::{DirectTransport, RelayTransport, Strategy, Transport};
