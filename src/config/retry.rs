//! # Conflict Retry Configuration
//!
//! Bounds for the optimistic-concurrency retry loop around status writes.

use super::env_var_or_default;
use std::time::Duration;

/// Retry policy for status writes that hit a resource version conflict
///
/// Attempt `n` (0-indexed) waits `initial_backoff * factor^(n-1)` before
/// running, capped at `max_backoff`. The first attempt runs immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one
    pub steps: u32,
    /// Delay before the second attempt
    pub initial_backoff: Duration,
    /// Growth factor between consecutive delays
    pub factor: f64,
    /// Upper bound on any single delay
    pub max_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        use crate::constants::*;
        Self {
            steps: DEFAULT_CONFLICT_RETRY_STEPS,
            initial_backoff: Duration::from_millis(DEFAULT_CONFLICT_RETRY_INITIAL_BACKOFF_MS),
            factor: DEFAULT_CONFLICT_RETRY_FACTOR,
            max_backoff: Duration::from_millis(DEFAULT_CONFLICT_RETRY_MAX_BACKOFF_MS),
        }
    }
}

impl RetryConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        use crate::constants::*;
        let steps = env_var_or_default("CONDITION_RETRY_STEPS", DEFAULT_CONFLICT_RETRY_STEPS);
        let factor = env_var_or_default("CONDITION_RETRY_FACTOR", DEFAULT_CONFLICT_RETRY_FACTOR);
        Self {
            // A zero budget would never issue the write at all
            steps: steps.max(1),
            initial_backoff: Duration::from_millis(env_var_or_default(
                "CONDITION_RETRY_INITIAL_BACKOFF_MS",
                DEFAULT_CONFLICT_RETRY_INITIAL_BACKOFF_MS,
            )),
            factor: if factor.is_finite() && factor >= 1.0 {
                factor
            } else {
                DEFAULT_CONFLICT_RETRY_FACTOR
            },
            max_backoff: Duration::from_millis(env_var_or_default(
                "CONDITION_RETRY_MAX_BACKOFF_MS",
                DEFAULT_CONFLICT_RETRY_MAX_BACKOFF_MS,
            )),
        }
    }

    /// Delay to wait before the given attempt (0-indexed)
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let scaled = self.initial_backoff.as_secs_f64() * self.factor.powi(exponent);
        if !scaled.is_finite() || scaled >= self.max_backoff.as_secs_f64() {
            return self.max_backoff;
        }
        Duration::from_secs_f64(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let config = RetryConfig::default();
        assert_eq!(config.steps, 5);
        assert_eq!(config.initial_backoff, Duration::from_millis(10));
        assert_eq!(config.max_backoff, Duration::from_secs(1));
    }

    #[test]
    fn test_backoff_grows_exponentially() {
        let config = RetryConfig::default();
        assert_eq!(config.backoff_for_attempt(0), Duration::ZERO);
        assert_eq!(config.backoff_for_attempt(1), Duration::from_millis(10));
        assert_eq!(config.backoff_for_attempt(2), Duration::from_millis(20));
        assert_eq!(config.backoff_for_attempt(3), Duration::from_millis(40));
    }

    #[test]
    fn test_backoff_is_capped() {
        let config = RetryConfig {
            steps: 64,
            initial_backoff: Duration::from_millis(100),
            factor: 10.0,
            max_backoff: Duration::from_millis(500),
        };
        assert_eq!(config.backoff_for_attempt(2), Duration::from_millis(500));
        assert_eq!(config.backoff_for_attempt(60), Duration::from_millis(500));
    }
}
