//! Errors surfaced by the debate use cases.

use crate::ports::participant_gateway::GatewayError;
use crate::ports::session_store::StoreError;
use debate_domain::{DomainError, Participant, SessionStatus};
use thiserror::Error;

/// Errors that can occur while running or enriching a debate
#[derive(Error, Debug)]
pub enum DebateError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Round {round} failed: {} of 3 participants did not respond", failures.len())]
    QuorumFailed {
        round: usize,
        failures: Vec<(Participant, GatewayError)>,
    },

    #[error("Hard cost ceiling of ${ceiling:.2} reached (spent ${spent:.4})")]
    HardCeilingReached { spent: f64, ceiling: f64 },

    #[error("Budget cap of ${cap:.2} is spent (${spent:.4}); resume with a higher cap")]
    BudgetExhausted { spent: f64, cap: f64 },

    #[error("Cannot {operation}: session {session_id} is {status}")]
    InvalidState {
        session_id: String,
        status: SessionStatus,
        operation: &'static str,
    },

    #[error("Synthesis by {participant} failed: {source}")]
    SynthesisFailed {
        participant: Participant,
        source: GatewayError,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl DebateError {
    pub(crate) fn invalid_state(
        session_id: &str,
        status: SessionStatus,
        operation: &'static str,
    ) -> Self {
        DebateError::InvalidState {
            session_id: session_id.to_string(),
            status,
            operation,
        }
    }
}
