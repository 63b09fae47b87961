//! Rounds and per-participant responses.

use crate::consensus::{ConsensusBreakdown, ScorableResponse};
use crate::core::error::DomainError;
use crate::core::participant::{ERROR_MODEL_TAG, Participant};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One participant's answer within a round.
///
/// A participant that failed is still represented, by a sentinel with
/// `confidence == 0` and `model == "error"`, so every round holds exactly
/// one response per participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub participant: Participant,
    pub content: String,
    pub confidence: u8,
    pub model: String,
    pub tokens_used: u64,
    pub cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AgentResponse {
    pub fn new(
        participant: Participant,
        content: impl Into<String>,
        confidence: u8,
        model: impl Into<String>,
        tokens_used: u64,
        cost: f64,
    ) -> Self {
        Self {
            participant,
            content: content.into(),
            confidence: confidence.min(100),
            model: model.into(),
            tokens_used,
            cost,
            error: None,
        }
    }

    /// Sentinel for a participant that did not answer
    pub fn failure(participant: Participant, error: impl Into<String>) -> Self {
        Self {
            participant,
            content: String::new(),
            confidence: 0,
            model: ERROR_MODEL_TAG.to_string(),
            tokens_used: 0,
            cost: 0.0,
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.model == ERROR_MODEL_TAG
    }

    pub fn as_scorable(&self) -> ScorableResponse<'_> {
        ScorableResponse::new(self.participant, &self.content, self.confidence)
    }
}

/// One completed exchange: all three responses plus their consensus grading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    number: usize,
    responses: Vec<AgentResponse>,
    breakdown: ConsensusBreakdown,
    cost: f64,
    tokens_used: u64,
    timestamp: DateTime<Utc>,
}

impl Round {
    /// Build a round. Requires exactly one response per participant; they
    /// are stored in canonical participant order.
    pub fn new(
        number: usize,
        mut responses: Vec<AgentResponse>,
        breakdown: ConsensusBreakdown,
    ) -> Result<Self, DomainError> {
        if number == 0 {
            return Err(DomainError::InvalidInput("round numbers start at 1".into()));
        }
        responses.sort_by_key(|r| r.participant);
        let participants: Vec<Participant> = responses.iter().map(|r| r.participant).collect();
        if participants != Participant::ALL {
            return Err(DomainError::InvalidInput(format!(
                "round {number} must contain exactly one response per participant"
            )));
        }
        let cost = responses.iter().map(|r| r.cost).sum();
        let tokens_used = responses.iter().map(|r| r.tokens_used).sum();
        Ok(Self {
            number,
            responses,
            breakdown,
            cost,
            tokens_used,
            timestamp: Utc::now(),
        })
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn responses(&self) -> &[AgentResponse] {
        &self.responses
    }

    pub fn response(&self, participant: Participant) -> Option<&AgentResponse> {
        self.responses.iter().find(|r| r.participant == participant)
    }

    pub fn valid_responses(&self) -> impl Iterator<Item = &AgentResponse> {
        self.responses.iter().filter(|r| !r.is_error())
    }

    pub fn valid_count(&self) -> usize {
        self.valid_responses().count()
    }

    pub fn breakdown(&self) -> &ConsensusBreakdown {
        &self.breakdown
    }

    pub fn consensus_score(&self) -> f64 {
        self.breakdown.overall_score
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn tokens_used(&self) -> u64 {
        self.tokens_used
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Longest valid response, ties broken by participant order
    pub fn longest_response(&self) -> Option<&AgentResponse> {
        self.valid_responses()
            .fold(None, |best: Option<&AgentResponse>, r| match best {
                Some(b) if b.content.chars().count() >= r.content.chars().count() => Some(b),
                _ => Some(r),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(p: Participant, content: &str, cost: f64) -> AgentResponse {
        AgentResponse::new(p, content, 80, p.default_model(), 100, cost)
    }

    fn full_set() -> Vec<AgentResponse> {
        vec![
            response(Participant::Gemini, "short", 0.03),
            response(Participant::Claude, "a much longer answer", 0.01),
            AgentResponse::failure(Participant::Gpt, "timeout"),
        ]
    }

    #[test]
    fn test_failure_sentinel() {
        let r = AgentResponse::failure(Participant::Gpt, "boom");
        assert!(r.is_error());
        assert_eq!(r.confidence, 0);
        assert_eq!(r.model, "error");
        assert_eq!(r.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_round_sorts_and_sums() {
        let round = Round::new(1, full_set(), ConsensusBreakdown::default()).unwrap();
        let order: Vec<_> = round.responses().iter().map(|r| r.participant).collect();
        assert_eq!(order, Participant::ALL);
        assert!((round.cost() - 0.04).abs() < 1e-12);
        assert_eq!(round.tokens_used(), 200);
        assert_eq!(round.valid_count(), 2);
    }

    #[test]
    fn test_round_requires_every_participant() {
        let mut set = full_set();
        set.pop();
        assert!(Round::new(1, set, ConsensusBreakdown::default()).is_err());

        let mut dup = full_set();
        dup[2] = response(Participant::Claude, "again", 0.0);
        assert!(Round::new(1, dup, ConsensusBreakdown::default()).is_err());
    }

    #[test]
    fn test_longest_response_skips_errors() {
        let round = Round::new(1, full_set(), ConsensusBreakdown::default()).unwrap();
        assert_eq!(
            round.longest_response().map(|r| r.participant),
            Some(Participant::Claude)
        );
    }
}
