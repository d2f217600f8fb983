//! Resilient caller: bounded retries with exponential backoff under one deadline.

use crate::backoff::RetryPolicy;
use crate::classify::{classify, RetryDecision};
use crate::config::ClientConfig;
use crate::error::{CallError, ConfigError, Failure};
use crate::prompt::Prompt;
use crate::recorder::ExchangeRecorder;
use crate::transport::{Strategy, Transport};
use std::time::Duration;
use tokio::time::{sleep, timeout_at, Instant};

/// Metrics for one successful logical call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallMetrics {
    /// Attempts made, including the successful one.
    pub attempts: u32,
    /// Time from the first attempt to the answer, backoff waits included.
    pub wall_time: Duration,
}

/// Runs logical calls over a [`Transport`], retrying transient failures.
///
/// One logical call is an explicit loop over at most
/// [`RetryPolicy::max_attempts`] attempts. A single deadline, `timeout` after
/// the call starts, bounds every attempt and every backoff wait; when it
/// fires the call ends with [`Failure::Cancelled`] whatever retry budget is
/// left.
///
/// The transport (and its pooled HTTP client) is shared read-only by all
/// calls made through this caller.
#[derive(Debug, Clone)]
pub struct ResilientCaller<T = Strategy> {
    transport: T,
    policy: RetryPolicy,
    timeout: Duration,
    recorder: Option<ExchangeRecorder>,
}

impl ResilientCaller<Strategy> {
    /// Builds a caller from `config`, selecting the transport strategy once.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let transport = Strategy::from_config(&config)?;
        tracing::debug!(
            event = "caller_configured",
            transport = transport.name(),
            model = %config.model,
            timeout_ms = u64::try_from(config.timeout.as_millis()).unwrap_or(u64::MAX),
            capture = config.capture_dir.is_some(),
            "caller_configured"
        );
        Ok(Self {
            transport,
            policy: config.retry,
            timeout: config.timeout,
            recorder: config.capture_dir.map(ExchangeRecorder::new),
        })
    }

    /// Builds a caller from [`ClientConfig::from_env`].
    ///
    /// # Errors
    ///
    /// See [`ResilientCaller::new`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(ClientConfig::from_env())
    }

    /// Whether calls go straight to the vendor API.
    #[must_use]
    pub const fn is_direct(&self) -> bool {
        self.transport.is_direct()
    }
}

impl<T: Transport> ResilientCaller<T> {
    /// Builds a caller over an explicit transport.
    #[must_use]
    pub const fn with_transport(transport: T, policy: RetryPolicy, timeout: Duration) -> Self {
        Self {
            transport,
            policy,
            timeout,
            recorder: None,
        }
    }

    /// Captures every successful exchange through `recorder`.
    #[must_use]
    pub fn with_recorder(mut self, recorder: ExchangeRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// The transport attempts are sent through.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// The retry policy applied to every call.
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Sends `prompt` with an output budget of `max_tokens` and returns the
    /// answer text.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::Terminal`] for a non-retryable failure or an
    /// elapsed deadline, and [`CallError::RetriesExhausted`] when every
    /// attempt failed transiently.
    pub async fn call(&self, prompt: &str, max_tokens: u32) -> Result<String, CallError> {
        self.call_prompt(&Prompt::new(prompt, max_tokens)).await
    }

    /// Like [`call`](Self::call), for an already built [`Prompt`].
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn call_prompt(&self, prompt: &Prompt) -> Result<String, CallError> {
        self.call_with_metrics(prompt).await.map(|(text, _)| text)
    }

    /// Like [`call_prompt`](Self::call_prompt), also reporting attempts made
    /// and wall time.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    #[tracing::instrument(
        skip_all,
        fields(transport = self.transport.name(), max_tokens = prompt.max_tokens())
    )]
    pub async fn call_with_metrics(
        &self,
        prompt: &Prompt,
    ) -> Result<(String, CallMetrics), CallError> {
        let start = Instant::now();
        let deadline = deadline_after(start, self.timeout);
        let mut attempts: u32 = 0;

        loop {
            if attempts > 0 {
                let wait = self.policy.backoff(attempts);
                tracing::debug!(
                    event = "backoff_wait",
                    retry = attempts,
                    wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                    "backoff_wait"
                );
                if timeout_at(deadline, sleep(wait)).await.is_err() {
                    return Err(CallError::Terminal {
                        attempts,
                        failure: Failure::Cancelled(format!(
                            "deadline of {:?} elapsed during backoff",
                            self.timeout
                        )),
                    });
                }
            }

            attempts += 1;
            tracing::debug!(
                event = "attempt_started",
                attempt = attempts,
                max_attempts = self.policy.max_attempts,
                "attempt_started"
            );

            let failure = match timeout_at(deadline, self.transport.attempt(prompt)).await {
                Ok(Ok(text)) => {
                    let metrics = CallMetrics {
                        attempts,
                        wall_time: start.elapsed(),
                    };
                    if let Some(recorder) = &self.recorder {
                        recorder.record_best_effort(prompt.text(), &text).await;
                    }
                    return Ok((text, metrics));
                }
                Ok(Err(failure)) => failure,
                Err(_) => Failure::Cancelled(format!(
                    "deadline of {:?} elapsed during attempt {attempts}",
                    self.timeout
                )),
            };

            let failure = if Instant::now() >= deadline {
                into_deadline_failure(failure)
            } else {
                failure
            };

            match classify(&failure) {
                RetryDecision::Stop => {
                    tracing::debug!(
                        event = "attempt_terminal",
                        attempt = attempts,
                        error = %failure,
                        "attempt_terminal"
                    );
                    return Err(CallError::Terminal { attempts, failure });
                }
                RetryDecision::Retry if !self.policy.has_attempts_left(attempts) => {
                    tracing::warn!(
                        event = "retries_exhausted",
                        attempts,
                        error = %failure,
                        "retries_exhausted"
                    );
                    return Err(CallError::RetriesExhausted {
                        attempts,
                        last: failure,
                    });
                }
                RetryDecision::Retry => {
                    tracing::warn!(
                        event = "attempt_retryable",
                        attempt = attempts,
                        max_attempts = self.policy.max_attempts,
                        error = %failure,
                        "attempt_retryable"
                    );
                }
            }
        }
    }
}

/// Stand-in deadline for timeouts too large to add to an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `start + timeout`, saturating at roughly thirty years.
fn deadline_after(start: Instant, timeout: Duration) -> Instant {
    start
        .checked_add(timeout)
        .or_else(|| start.checked_add(FAR_FUTURE))
        .unwrap_or(start)
}

/// Once the deadline has passed a transient failure is no longer worth
/// retrying; report it as a cancellation. Terminal failures keep their kind.
fn into_deadline_failure(failure: Failure) -> Failure {
    match classify(&failure) {
        RetryDecision::Retry => Failure::Cancelled(format!("deadline elapsed: {failure}")),
        RetryDecision::Stop => failure,
    }
}
