//! Domain layer for consensus-debate
//!
//! This crate contains the core debate rules, entities and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! Three fixed participants answer the same question over several rounds.
//! After each round the answers are graded for consensus:
//!
//! - **Consensus scoring**: five lexical components with fixed weights
//!   ([`consensus::LexicalConsensusScorer`])
//! - **Session state machine**: active → consensus / deadlock / paused / failed
//!   ([`session::SessionStatus`])
//! - **Budget guard**: a per-session soft cap and a global hard ceiling
//! - **Deadlock analysis**: disagreement type and resolvability
//! - **Enrichments**: anonymized peer review and chairman synthesis, run on demand

pub mod budget;
pub mod chairman;
pub mod config;
pub mod consensus;
pub mod core;
pub mod disagreement;
pub mod peer_review;
pub mod prompt;
pub mod report;
pub mod resolution;
pub mod session;

// Re-export commonly used types
pub use budget::{BudgetStatus, HARD_COST_CEILING_USD, check_budget_limit, hard_ceiling_reached};
pub use chairman::{SynthesisResult, select_optimal_chairman};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use consensus::{
    ConsensusBreakdown, ConsensusBucket, ConsensusScorer, LexicalConsensusScorer,
    ScorableResponse, extract_confidence,
};
pub use core::{
    error::DomainError,
    participant::{ERROR_MODEL_TAG, Participant},
    question::Question,
};
pub use disagreement::{
    DisagreementReport, DisagreementType, HumanInterventionRequest, InterventionOption,
};
pub use peer_review::{PeerReviewResult, ReviewLabel};
pub use prompt::PromptTemplate;
pub use report::DebateReport;
pub use resolution::{accept_answer, manual_resolution};
pub use session::{
    AgentResponse, CONSENSUS_THRESHOLD, DebateSettings, Resolution, Round, RoundCheckpoint,
    Session, SessionStatus, Strategy,
};
