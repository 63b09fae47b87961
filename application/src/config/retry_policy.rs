//! Timeout and retry policy for participant calls.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bounded retry with exponential backoff.
///
/// Every call resolves to success or failure: each attempt is capped by
/// `timeout`, and at most `max_attempts` attempts are made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub backoff_multiplier: u32,
    pub timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            backoff_multiplier: 2,
            timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no timeout
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            backoff_multiplier: 1,
            timeout: None,
        }
    }

    /// Delay before attempt `attempt` (1-based); zero before the first
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let factor = self.backoff_multiplier.saturating_pow(attempt - 2);
        self.initial_backoff.saturating_mul(factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_backoff() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_for(1), Duration::ZERO);
        assert_eq!(policy.backoff_for(2), Duration::from_millis(500));
        assert_eq!(policy.backoff_for(3), Duration::from_millis(1000));
        assert_eq!(policy.backoff_for(4), Duration::from_millis(2000));
    }

    #[test]
    fn test_none_policy() {
        let policy = RetryPolicy::none();
        assert_eq!(policy.max_attempts, 1);
        assert!(policy.timeout.is_none());
    }
}
