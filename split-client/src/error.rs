//! Error types for the call layer: per-attempt failures and caller-level outcomes.

use std::path::PathBuf;
use thiserror::Error;

/// Coarse tag of a [`Failure`], used by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Connection error or transport timeout before a response arrived.
    Network,
    /// The service answered HTTP 429.
    RateLimited,
    /// The service answered with a 5xx status.
    ServerError,
    /// The service answered with a 4xx status other than 429.
    ClientError,
    /// The call deadline fired or the request was cancelled.
    Cancelled,
    /// The response arrived but did not have the expected shape.
    Protocol,
}

/// Why a single attempt failed.
///
/// Every variant carries the diagnostic text of the underlying cause (the
/// response body for HTTP failures) so it can be logged or shown to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Failure {
    /// Connection error or transport timeout before any response.
    #[error("network error: {0}")]
    Network(String),

    /// HTTP 429.
    #[error("rate limited (HTTP {status}): {body}")]
    RateLimited {
        /// HTTP status code.
        status: u16,
        /// Response body, surfaced for diagnostics.
        body: String,
    },

    /// HTTP 5xx.
    #[error("server error (HTTP {status}): {body}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Response body, surfaced for diagnostics.
        body: String,
    },

    /// HTTP 4xx other than 429.
    #[error("client error (HTTP {status}): {body}")]
    ClientError {
        /// HTTP status code.
        status: u16,
        /// Response body, surfaced for diagnostics.
        body: String,
    },

    /// The call deadline elapsed or the request was cancelled.
    #[error("call cancelled: {0}")]
    Cancelled(String),

    /// Malformed or unexpected response shape.
    #[error("unexpected response: {0}")]
    Protocol(String),
}

impl Failure {
    /// Returns the coarse tag of this failure.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Network(_) => FailureKind::Network,
            Self::RateLimited { .. } => FailureKind::RateLimited,
            Self::ServerError { .. } => FailureKind::ServerError,
            Self::ClientError { .. } => FailureKind::ClientError,
            Self::Cancelled(_) => FailureKind::Cancelled,
            Self::Protocol(_) => FailureKind::Protocol,
        }
    }

    /// HTTP status attached to this failure, if the service answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited { status, .. }
            | Self::ServerError { status, .. }
            | Self::ClientError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Outcome of a logical call that did not produce text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CallError {
    /// A non-retryable failure ended the call.
    #[error("non-retryable failure after {attempts} attempt(s): {failure}")]
    Terminal {
        /// Attempts made, including the failing one.
        attempts: u32,
        /// The failure that ended the call.
        failure: Failure,
    },

    /// Every allowed attempt failed with a retryable failure.
    #[error("failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Attempts made (equals the policy's maximum).
        attempts: u32,
        /// The failure observed on the final attempt.
        last: Failure,
    },
}

impl CallError {
    /// The failure that ended the call.
    #[must_use]
    pub const fn failure(&self) -> &Failure {
        match self {
            Self::Terminal { failure, .. } => failure,
            Self::RetriesExhausted { last, .. } => last,
        }
    }

    /// Number of attempts made before giving up.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Terminal { attempts, .. } | Self::RetriesExhausted { attempts, .. } => *attempts,
        }
    }

    /// Shorthand for `self.failure().kind()`.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        self.failure().kind()
    }
}

/// Invalid configuration detected while building a caller.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The model identifier was empty.
    #[error("model identifier must not be empty")]
    EmptyModel,

    /// An endpoint or base URL could not be parsed.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending value.
        url: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The timeout was zero.
    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    /// The retry policy allows no attempts.
    #[error("retry policy must allow at least one attempt")]
    NoAttempts,

    /// The shared HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Failure to persist an exchange. Only ever logged.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// The capture directory could not be created.
    #[error("create capture dir {path}: {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// One of the exchange files could not be written.
    #[error("write {path}: {source}")]
    Write {
        /// File that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
