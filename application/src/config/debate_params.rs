//! Debate parameters: use case behavior that is not domain policy.

use super::retry_policy::RetryPolicy;
use debate_domain::{DebateSettings, Participant};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Static parameters shared by the debate use cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateParams {
    /// Limits applied when a caller does not choose its own
    pub defaults: DebateSettings,
    /// Rounds granted when a session that used all of its rounds is resumed
    pub continuation_rounds: usize,
    /// Per-participant model overrides passed through to the gateway
    pub models: BTreeMap<Participant, String>,
    pub retry: RetryPolicy,
}

impl Default for DebateParams {
    fn default() -> Self {
        Self {
            defaults: DebateSettings::default(),
            continuation_rounds: 2,
            models: BTreeMap::new(),
            retry: RetryPolicy::default(),
        }
    }
}

impl DebateParams {
    // ==================== Builder Methods ====================

    pub fn with_defaults(mut self, defaults: DebateSettings) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_continuation_rounds(mut self, rounds: usize) -> Self {
        self.continuation_rounds = rounds;
        self
    }

    pub fn with_model(mut self, participant: Participant, model: impl Into<String>) -> Self {
        self.models.insert(participant, model.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    // ==================== Accessors ====================

    pub fn model_override(&self, participant: Participant) -> Option<&str> {
        self.models.get(&participant).map(String::as_str)
    }
}
