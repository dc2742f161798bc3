//! Retry policy of a call.
//!
//! The policy is declarative. Timing out and deciding to resend is the job of
//! the request framework; the call only keeps count.

use std::time::Duration;

/// Default socket timeout of an attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Default backoff multiplier.
pub const DEFAULT_BACKOFF_MULTIPLIER: f32 = 1.0;

/// Timeout and retry settings for a call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    timeout: Duration,
    max_retries: u32,
    backoff_multiplier: f32,
}

impl RetryPolicy {
    /// Create a policy.
    ///
    /// A negative or non-finite multiplier is treated as `0.0`, i.e. no backoff.
    pub fn new(timeout: Duration, max_retries: u32, backoff_multiplier: f32) -> Self {
        let backoff_multiplier = if backoff_multiplier.is_finite() && backoff_multiplier > 0.0 {
            backoff_multiplier
        } else {
            0.0
        };

        RetryPolicy {
            timeout,
            max_retries,
            backoff_multiplier,
        }
    }

    /// Timeout of the first attempt.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Number of retries allowed after the first attempt.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// How much of the current timeout is added on each retry.
    pub fn backoff_multiplier(&self) -> f32 {
        self.backoff_multiplier
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::new(
            DEFAULT_TIMEOUT,
            DEFAULT_MAX_RETRIES,
            DEFAULT_BACKOFF_MULTIPLIER,
        )
    }
}

/// Progress through a [`RetryPolicy`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct RetryState {
    policy: RetryPolicy,
    retries: u32,
    current_timeout: Duration,
}

impl RetryState {
    pub fn new(policy: RetryPolicy) -> Self {
        RetryState {
            policy,
            retries: 0,
            current_timeout: policy.timeout,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn current_timeout(&self) -> Duration {
        self.current_timeout
    }

    /// Count a retry and grow the timeout. Returns `false` when the policy is
    /// exhausted.
    pub fn retry(&mut self) -> bool {
        self.retries = self.retries.saturating_add(1);

        let grow = self.current_timeout.as_secs_f64() * self.policy.backoff_multiplier as f64;
        let grow = Duration::try_from_secs_f64(grow).unwrap_or(Duration::MAX);
        self.current_timeout = self.current_timeout.saturating_add(grow);

        self.retries <= self.policy.max_retries
    }
}
