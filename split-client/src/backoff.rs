//! Retry policy and exponential backoff schedule.

use std::time::Duration;

/// Attempts per logical call: one initial attempt plus three retries.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;

/// Wait before the first retry; later waits double.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Growth factor between successive waits.
pub const DEFAULT_MULTIPLIER: u32 = 2;

/// Bounded retry configuration for one logical call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts allowed, including the first (default: 4).
    pub max_attempts: u32,
    /// Wait before the first retry (default: 1s).
    pub base_delay: Duration,
    /// Multiplier applied per further retry (default: 2).
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            multiplier: DEFAULT_MULTIPLIER,
        }
    }
}

impl RetryPolicy {
    /// Sets the total number of attempts.
    #[must_use]
    pub const fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max;
        self
    }

    /// Sets the wait before the first retry.
    #[must_use]
    pub const fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Wait before retry number `retry` (1-based).
    ///
    /// `base * multiplier^(retry-1)`: with the defaults this is 1s, 2s, 4s.
    /// Retry 0 has no wait. Saturates instead of overflowing.
    #[must_use]
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }
        let factor = self.multiplier.saturating_pow(retry - 1);
        self.base_delay.saturating_mul(factor)
    }

    /// Whether another attempt may follow `attempts_made` attempts.
    #[must_use]
    pub const fn has_attempts_left(&self, attempts_made: u32) -> bool {
        attempts_made < self.max_attempts
    }
}
