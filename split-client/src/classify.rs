//! Failure classification: HTTP status mapping and the retry decision.

use crate::error::{Failure, FailureKind};

/// Longest response body kept in a failure diagnostic, in characters.
const MAX_DIAGNOSTIC_CHARS: usize = 2000;

/// What the caller should do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Transient; try again after the backoff wait.
    Retry,
    /// Terminal; return the failure now.
    Stop,
}

/// Decides whether a failure is worth another attempt.
///
/// `Network`, `RateLimited` and `ServerError` are transient. `ClientError`,
/// `Protocol` and `Cancelled` are terminal: the service would answer an
/// identical request the same way, or the caller has given up.
#[must_use]
pub const fn classify(failure: &Failure) -> RetryDecision {
    match failure.kind() {
        FailureKind::Network | FailureKind::RateLimited | FailureKind::ServerError => {
            RetryDecision::Retry
        }
        FailureKind::ClientError | FailureKind::Cancelled | FailureKind::Protocol => {
            RetryDecision::Stop
        }
    }
}

/// Maps a non-success HTTP status and its body to a [`Failure`].
///
/// 429 is `RateLimited`, 5xx is `ServerError`, anything else is
/// `ClientError`.
#[must_use]
pub fn failure_from_status(status: u16, body: &str) -> Failure {
    let body = truncate_diagnostic(body);
    match status {
        429 => Failure::RateLimited { status, body },
        500..=599 => Failure::ServerError { status, body },
        _ => Failure::ClientError { status, body },
    }
}

/// Shortens a response body for inclusion in an error message.
fn truncate_diagnostic(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_DIAGNOSTIC_CHARS) {
        Some((idx, _)) => format!("{}... (truncated)", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
