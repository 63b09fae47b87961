//! Session status state machine.
//!
//! ```text
//!                 ┌──────────── continue ────────────┐
//!                 ▼                                   │
//!   ┌────────► active ──score ≥ 0.85──► consensus    │
//!   │            │ │                                  │
//!   │ continue   │ └──rounds/budget exhausted──► deadlock ──accept──► user_accepted
//!   │            │                                  │  └──fallback──► manually_resolved
//!   └── paused ◄─┘ (interactive)                    │
//!          └────────────── stop ────────────────────┘
//!   active ──hard ceiling / quorum failure──► failed
//! ```

use crate::budget::BudgetStatus;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Overall score at or above which a round counts as consensus
pub const CONSENSUS_THRESHOLD: f64 = 0.85;

/// Lifecycle status of a debate session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Consensus,
    Deadlock,
    Paused,
    Failed,
    UserAccepted,
    ManuallyResolved,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Consensus => "consensus",
            SessionStatus::Deadlock => "deadlock",
            SessionStatus::Paused => "paused",
            SessionStatus::Failed => "failed",
            SessionStatus::UserAccepted => "user_accepted",
            SessionStatus::ManuallyResolved => "manually_resolved",
        }
    }

    /// Terminal for the orchestration loop; the session stays readable.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionStatus::Consensus
                | SessionStatus::Failed
                | SessionStatus::UserAccepted
                | SessionStatus::ManuallyResolved
        )
    }

    /// Whether an explicit continuation may reactivate the session
    pub fn is_resumable(&self) -> bool {
        matches!(self, SessionStatus::Paused | SessionStatus::Deadlock)
    }

    pub fn can_transition_to(&self, next: SessionStatus) -> bool {
        use SessionStatus::*;
        matches!(
            (self, next),
            (Active, Consensus | Deadlock | Paused | Failed)
                | (Paused, Active | Deadlock)
                | (Deadlock, Active | UserAccepted | ManuallyResolved)
        )
    }

    /// Validate a transition, returning the new status
    pub fn transition_to(self, next: SessionStatus) -> Result<SessionStatus, DomainError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Facts known at a round boundary, used to decide the next status
#[derive(Debug, Clone, Copy)]
pub struct RoundCheckpoint {
    pub score: f64,
    pub rounds_completed: usize,
    pub max_rounds: usize,
    pub interactive: bool,
    pub budget: BudgetStatus,
    pub hard_ceiling_reached: bool,
}

impl RoundCheckpoint {
    /// Status an active session moves to after this round, or `None` to keep going.
    ///
    /// Precedence: hard ceiling, consensus, soft cap, round limit, interactive pause.
    pub fn decide(&self) -> Option<SessionStatus> {
        if self.hard_ceiling_reached {
            Some(SessionStatus::Failed)
        } else if self.score >= CONSENSUS_THRESHOLD {
            Some(SessionStatus::Consensus)
        } else if !self.budget.within_budget || self.rounds_completed >= self.max_rounds {
            Some(SessionStatus::Deadlock)
        } else if self.interactive {
            Some(SessionStatus::Paused)
        } else {
            None
        }
    }
}
