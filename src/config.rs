use crate::retry::RetryPolicy;

/// Settings for a [`Call`](crate::Call), fixed at construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    verbose_envelope: bool,
    retry_policy: RetryPolicy,
}

impl Config {
    /// Default config: quiet, with the default [`RetryPolicy`].
    pub fn new() -> Self {
        Config::default()
    }

    /// Log every rendered envelope at debug level.
    pub fn verbose_envelope(mut self, enabled: bool) -> Self {
        self.verbose_envelope = enabled;
        self
    }

    /// Use another retry policy.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Whether envelopes are logged.
    pub fn is_verbose_envelope(&self) -> bool {
        self.verbose_envelope
    }

    /// The retry policy.
    pub fn get_retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }
}
