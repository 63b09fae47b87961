//! Participant call retry settings (`[retry]` section)

use debate_application::RetryPolicy;
use debate_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub backoff_multiplier: u32,
    /// Per-attempt timeout; 0 disables it
    pub timeout_secs: u64,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 500,
            backoff_multiplier: 2,
            timeout_secs: 120,
        }
    }
}

impl FileRetryConfig {
    pub fn to_policy(&self) -> (RetryPolicy, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let max_attempts = if self.max_attempts == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "retry.max_attempts".to_string(),
                    value: "0".to_string(),
                },
                "retry.max_attempts: must be at least 1, using 1",
            ));
            1
        } else {
            self.max_attempts
        };

        let backoff_multiplier = if self.backoff_multiplier == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "retry.backoff_multiplier".to_string(),
                    value: "0".to_string(),
                },
                "retry.backoff_multiplier: must be at least 1, using 1",
            ));
            1
        } else {
            self.backoff_multiplier
        };

        let policy = RetryPolicy {
            max_attempts,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            backoff_multiplier,
            timeout: (self.timeout_secs > 0).then_some(Duration::from_secs(self.timeout_secs)),
        };
        (policy, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_policy_default() {
        let (policy, issues) = FileRetryConfig::default().to_policy();
        assert!(issues.is_empty());
        assert_eq!(policy, RetryPolicy::default());
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let config = FileRetryConfig {
            timeout_secs: 0,
            max_attempts: 0,
            ..Default::default()
        };
        let (policy, issues) = config.to_policy();
        assert_eq!(policy.timeout, None);
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(issues.len(), 1);
    }
}
