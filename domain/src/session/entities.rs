//! The debate session aggregate.

use super::round::Round;
use super::status::SessionStatus;
use super::strategy::Strategy;
use crate::chairman::SynthesisResult;
use crate::core::error::DomainError;
use crate::core::participant::Participant;
use crate::core::question::Question;
use crate::peer_review::PeerReviewResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Caller-chosen limits for a new session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateSettings {
    pub max_rounds: usize,
    pub max_cost: f64,
    pub strategy: Strategy,
    pub interactive: bool,
}

impl Default for DebateSettings {
    fn default() -> Self {
        Self {
            max_rounds: 3,
            max_cost: 1.0,
            strategy: Strategy::default(),
            interactive: false,
        }
    }
}

impl DebateSettings {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_rounds == 0 {
            return Err(DomainError::InvalidInput("max_rounds must be at least 1".into()));
        }
        if !self.max_cost.is_finite() || self.max_cost <= 0.0 {
            return Err(DomainError::InvalidInput(format!(
                "max_cost must be a positive amount, got {}",
                self.max_cost
            )));
        }
        Ok(())
    }
}

/// How a deadlocked session was closed by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// The user picked one participant's latest answer
    Accepted {
        participant: Participant,
        round: usize,
        content: String,
    },
    /// Fallback to the longest latest answer
    Manual {
        participant: Participant,
        round: usize,
        content: String,
    },
}

impl Resolution {
    pub fn content(&self) -> &str {
        match self {
            Resolution::Accepted { content, .. } | Resolution::Manual { content, .. } => content,
        }
    }

    pub fn participant(&self) -> Participant {
        match self {
            Resolution::Accepted { participant, .. } | Resolution::Manual { participant, .. } => {
                *participant
            }
        }
    }
}

/// A multi-round debate on one question.
///
/// Owns its rounds. `current_cost` always equals the sum of round costs;
/// peer review and synthesis spend is tracked separately in `enrichment_cost`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: String,
    question: Question,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<String>,
    rounds: Vec<Round>,
    status: SessionStatus,
    max_rounds: usize,
    max_cost: f64,
    current_cost: f64,
    #[serde(default)]
    enrichment_cost: f64,
    #[serde(default)]
    total_tokens: u64,
    #[serde(default)]
    strategy: Strategy,
    #[serde(default)]
    interactive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pending_guidance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    peer_review: Option<PeerReviewResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    synthesis: Option<SynthesisResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resolution: Option<Resolution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failure_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(
        question: Question,
        context: Option<String>,
        settings: DebateSettings,
    ) -> Result<Self, DomainError> {
        settings.validate()?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            question,
            context: context.filter(|c| !c.trim().is_empty()),
            rounds: Vec::new(),
            status: SessionStatus::Active,
            max_rounds: settings.max_rounds,
            max_cost: settings.max_cost,
            current_cost: 0.0,
            enrichment_cost: 0.0,
            total_tokens: 0,
            strategy: settings.strategy,
            interactive: settings.interactive,
            pending_guidance: None,
            peer_review: None,
            synthesis: None,
            resolution: None,
            failure_reason: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn round(&self, number: usize) -> Result<&Round, DomainError> {
        number
            .checked_sub(1)
            .and_then(|i| self.rounds.get(i))
            .ok_or(DomainError::RoundNotFound(number))
    }

    pub fn latest_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    pub fn max_cost(&self) -> f64 {
        self.max_cost
    }

    /// Sum of all round costs
    pub fn current_cost(&self) -> f64 {
        self.current_cost
    }

    pub fn enrichment_cost(&self) -> f64 {
        self.enrichment_cost
    }

    /// Debate plus enrichment spend
    pub fn total_cost(&self) -> f64 {
        self.current_cost + self.enrichment_cost
    }

    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn pending_guidance(&self) -> Option<&str> {
        self.pending_guidance.as_deref()
    }

    pub fn peer_review(&self) -> Option<&PeerReviewResult> {
        self.peer_review.as_ref()
    }

    pub fn synthesis(&self) -> Option<&SynthesisResult> {
        self.synthesis.as_ref()
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn next_round_number(&self) -> usize {
        self.rounds.len() + 1
    }

    pub fn rounds_remaining(&self) -> usize {
        self.max_rounds.saturating_sub(self.rounds.len())
    }

    /// Score trend across rounds, oldest first
    pub fn score_trend(&self) -> Vec<f64> {
        self.rounds.iter().map(Round::consensus_score).collect()
    }

    /// Append a round. The session must be active and numbering contiguous.
    pub fn record_round(&mut self, round: Round) -> Result<(), DomainError> {
        if self.status != SessionStatus::Active {
            return Err(DomainError::InvalidInput(format!(
                "cannot record a round while the session is {}",
                self.status
            )));
        }
        let expected = self.next_round_number();
        if round.number() != expected {
            return Err(DomainError::InvalidInput(format!(
                "expected round {expected}, got round {}",
                round.number()
            )));
        }
        self.current_cost += round.cost();
        self.total_tokens += round.tokens_used();
        self.rounds.push(round);
        self.touch();
        Ok(())
    }

    pub fn transition(&mut self, next: SessionStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(next)?;
        self.touch();
        Ok(())
    }

    /// Move an active session to `failed`, remembering why
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), DomainError> {
        self.transition(SessionStatus::Failed)?;
        self.failure_reason = Some(reason.into());
        Ok(())
    }

    /// Grant more rounds to a session that has used all of its own
    pub fn extend_max_rounds(&mut self, additional: usize) {
        self.max_rounds += additional;
        self.touch();
    }

    /// Raise the soft budget cap; the cap never shrinks
    pub fn raise_max_cost(&mut self, max_cost: f64) -> Result<(), DomainError> {
        if !max_cost.is_finite() || max_cost <= self.max_cost {
            return Err(DomainError::InvalidInput(format!(
                "new budget cap must exceed ${:.2}, got {}",
                self.max_cost, max_cost
            )));
        }
        self.max_cost = max_cost;
        self.touch();
        Ok(())
    }

    pub fn set_guidance(&mut self, guidance: Option<String>) {
        self.pending_guidance = guidance.filter(|g| !g.trim().is_empty());
        self.touch();
    }

    /// Bill enrichment calls that produced no attachable result
    pub fn record_enrichment_spend(&mut self, cost: f64, tokens_used: u64) {
        self.enrichment_cost += cost;
        self.total_tokens += tokens_used;
        self.touch();
    }

    pub fn attach_peer_review(&mut self, review: PeerReviewResult) {
        self.record_enrichment_spend(review.cost, review.tokens_used);
        self.peer_review = Some(review);
    }

    pub fn attach_synthesis(&mut self, synthesis: SynthesisResult) {
        self.record_enrichment_spend(synthesis.cost, synthesis.tokens_used);
        self.synthesis = Some(synthesis);
    }

    /// Close a deadlocked session with a user decision
    pub fn resolve(&mut self, resolution: Resolution) -> Result<(), DomainError> {
        let next = match resolution {
            Resolution::Accepted { .. } => SessionStatus::UserAccepted,
            Resolution::Manual { .. } => SessionStatus::ManuallyResolved,
        };
        self.transition(next)?;
        self.resolution = Some(resolution);
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
