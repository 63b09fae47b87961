//! Read-only report data for presentation layers.

use crate::budget::{BudgetStatus, check_budget_limit};
use crate::consensus::ConsensusBreakdown;
use crate::disagreement::{DisagreementReport, analyze};
use crate::session::{Session, SessionStatus};
use serde::{Deserialize, Serialize};

/// Raw session data plus the derived figures a renderer needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateReport {
    pub session: Session,
    pub latest_breakdown: Option<ConsensusBreakdown>,
    pub score_trend: Vec<f64>,
    /// Present whenever the latest round fell short of consensus
    pub disagreement: Option<DisagreementReport>,
    pub budget: BudgetStatus,
}

impl DebateReport {
    pub fn from_session(session: Session) -> Self {
        let latest = session.latest_round();
        let latest_breakdown = latest.map(|r| r.breakdown().clone());
        let disagreement = latest
            .filter(|_| session.status() != SessionStatus::Consensus)
            .map(analyze);
        let score_trend = session.score_trend();
        let budget = check_budget_limit(session.current_cost(), session.max_cost());
        Self {
            session,
            latest_breakdown,
            score_trend,
            disagreement,
            budget,
        }
    }
}
