//! Bounded exponential backoff for transient API failures.

use std::time::Duration;

const DEFAULT_ATTEMPTS: u32 = 5;
const DEFAULT_EXP_BASE: u32 = 7;
const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);
const DEFAULT_RETRYABLE_STATUS: [u16; 4] = [429, 500, 503, 504];

/// Retry configuration for the backend client.
///
/// The delay before retry `n` (1-based) is
/// `initial_delay * exp_base^(n-1)`, capped at `max_delay`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub exp_base: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub retryable_status: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            exp_base: DEFAULT_EXP_BASE,
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            retryable_status: DEFAULT_RETRYABLE_STATUS.to_vec(),
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    pub fn with_exp_base(mut self, base: u32) -> Self {
        self.exp_base = base.max(1);
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_retryable_status(mut self, codes: Vec<u16>) -> Self {
        self.retryable_status = codes;
        self
    }

    pub fn is_retryable(&self, status: u16) -> bool {
        self.retryable_status.contains(&status)
    }

    /// Delay before the given retry attempt (1-based), capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let factor = (self.exp_base as u64).saturating_pow(exponent);
        let delay = self
            .initial_delay
            .saturating_mul(factor.min(u32::MAX as u64) as u32);
        delay.min(self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 5);
        assert_eq!(policy.exp_base, 7);
        assert_eq!(policy.initial_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_retryable_status() {
        let policy = RetryPolicy::default();
        assert!(policy.is_retryable(429));
        assert!(policy.is_retryable(500));
        assert!(policy.is_retryable(503));
        assert!(policy.is_retryable(504));
        assert!(!policy.is_retryable(400));
        assert!(!policy.is_retryable(401));
        assert!(!policy.is_retryable(404));
    }

    #[test]
    fn test_delay_growth() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(7));
        assert_eq!(policy.delay_for(3), Duration::from_secs(49));
    }

    #[test]
    fn test_delay_is_capped() {
        let policy = RetryPolicy::default();
        // 7^3 = 343s would exceed the 60s cap
        assert_eq!(policy.delay_for(4), Duration::from_secs(60));
        assert_eq!(policy.delay_for(10), Duration::from_secs(60));
    }

    #[test]
    fn test_builder_overrides() {
        let policy = RetryPolicy::new()
            .with_attempts(3)
            .with_exp_base(2)
            .with_initial_delay(Duration::from_millis(100))
            .with_retryable_status(vec![502]);

        assert_eq!(policy.attempts, 3);
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert!(policy.is_retryable(502));
        assert!(!policy.is_retryable(429));
    }

    #[test]
    fn test_attempts_floor() {
        let policy = RetryPolicy::new().with_attempts(0);
        assert_eq!(policy.attempts, 1);
    }
}
