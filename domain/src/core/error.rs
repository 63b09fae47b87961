//! Domain error types

use crate::session::status::SessionStatus;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: SessionStatus, to: SessionStatus },

    #[error("Round {0} does not exist")]
    RoundNotFound(usize),

    #[error("Session has no rounds yet")]
    NoRounds,

    #[error("Participant {0} has no valid response in the selected round")]
    NoValidResponse(String),

    #[error("Peer review needs at least {required} successful reviews, got {received}")]
    InsufficientReviews { received: usize, required: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl DomainError {
    /// Check if this error is a rejected state transition
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, DomainError::InvalidTransition { .. })
    }
}
