//! Consensus measurement domain
//!
//! Pure text heuristics that grade how much the three participants agree.
//!
//! # Components
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  overall = 0.35·semantic + 0.25·factual + 0.15·tonal         │
//! │          + 0.10·structural + 0.15·confidence_alignment       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - [`confidence`]: per-response confidence extraction shared by adapters
//! - [`text`]: tokenization, keyword profiles, fact and sentiment extraction
//! - [`scorer`]: the [`ConsensusScorer`] contract and its lexical implementation
//!
//! The scorer is a trait so an embedding-based implementation can replace
//! the lexical one without touching the orchestrator.

pub mod breakdown;
pub mod confidence;
pub mod scorer;
pub mod text;

pub use breakdown::{
    ConsensusBreakdown, ConsensusBucket, DisagreementPoint, KeyDifference, ParticipantView,
    WEIGHT_CONFIDENCE, WEIGHT_FACTUAL, WEIGHT_SEMANTIC, WEIGHT_STRUCTURAL, WEIGHT_TONAL,
};
pub use confidence::extract_confidence;
pub use scorer::{ConsensusScorer, LexicalConsensusScorer, ScorableResponse, jaccard};
