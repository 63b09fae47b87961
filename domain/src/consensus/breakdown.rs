//! Consensus breakdown value objects.

use crate::core::participant::Participant;
use serde::{Deserialize, Serialize};

pub const WEIGHT_SEMANTIC: f64 = 0.35;
pub const WEIGHT_FACTUAL: f64 = 0.25;
pub const WEIGHT_TONAL: f64 = 0.15;
pub const WEIGHT_STRUCTURAL: f64 = 0.10;
pub const WEIGHT_CONFIDENCE: f64 = 0.15;

/// One participant's position on a disagreement point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantView {
    pub participant: Participant,
    pub view: String,
}

/// A point on which participants diverge, with each participant's view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisagreementPoint {
    pub point: String,
    pub views: Vec<ParticipantView>,
}

/// A low-scoring dimension with a canned explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyDifference {
    pub dimension: String,
    pub explanation: String,
}

impl KeyDifference {
    pub fn new(dimension: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            dimension: dimension.into(),
            explanation: explanation.into(),
        }
    }
}

/// Five-component consensus measurement for one round
///
/// Every component lies in `[0, 1]`; `overall_score` is their fixed-weight
/// combination (see [`ConsensusBreakdown::weighted_overall`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsensusBreakdown {
    pub overall_score: f64,
    pub semantic_similarity: f64,
    pub factual_agreement: f64,
    pub tonal_alignment: f64,
    pub structural_similarity: f64,
    pub confidence_alignment: f64,
    #[serde(default)]
    pub agreement_points: Vec<String>,
    #[serde(default)]
    pub disagreement_points: Vec<DisagreementPoint>,
    #[serde(default)]
    pub key_differences: Vec<KeyDifference>,
}

impl ConsensusBreakdown {
    /// Build a breakdown from its five components, deriving `overall_score`.
    pub fn from_components(
        semantic_similarity: f64,
        factual_agreement: f64,
        tonal_alignment: f64,
        structural_similarity: f64,
        confidence_alignment: f64,
    ) -> Self {
        let overall_score = Self::weighted_overall(
            semantic_similarity,
            factual_agreement,
            tonal_alignment,
            structural_similarity,
            confidence_alignment,
        );
        Self {
            overall_score,
            semantic_similarity,
            factual_agreement,
            tonal_alignment,
            structural_similarity,
            confidence_alignment,
            agreement_points: Vec::new(),
            disagreement_points: Vec::new(),
            key_differences: Vec::new(),
        }
    }

    /// The fixed-weight combination of the five components, clamped to `[0, 1]`.
    pub fn weighted_overall(
        semantic: f64,
        factual: f64,
        tonal: f64,
        structural: f64,
        confidence: f64,
    ) -> f64 {
        (WEIGHT_SEMANTIC * semantic
            + WEIGHT_FACTUAL * factual
            + WEIGHT_TONAL * tonal
            + WEIGHT_STRUCTURAL * structural
            + WEIGHT_CONFIDENCE * confidence)
            .clamp(0.0, 1.0)
    }

    /// Qualitative bucket for progress reporting
    pub fn bucket(&self) -> ConsensusBucket {
        ConsensusBucket::from_score(self.overall_score)
    }

    /// Short labels of the disagreement points (used for synthesis bookkeeping)
    pub fn disagreement_labels(&self) -> Vec<String> {
        self.disagreement_points
            .iter()
            .map(|d| d.point.clone())
            .collect()
    }
}

/// Qualitative strength of agreement in a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusBucket {
    /// overall > 0.85
    Strong,
    /// overall > 0.6
    Partial,
    Weak,
}

impl ConsensusBucket {
    pub fn from_score(score: f64) -> Self {
        if score > 0.85 {
            ConsensusBucket::Strong
        } else if score > 0.6 {
            ConsensusBucket::Partial
        } else {
            ConsensusBucket::Weak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsensusBucket::Strong => "strong",
            ConsensusBucket::Partial => "partial",
            ConsensusBucket::Weak => "weak",
        }
    }
}

impl std::fmt::Display for ConsensusBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let sum =
            WEIGHT_SEMANTIC + WEIGHT_FACTUAL + WEIGHT_TONAL + WEIGHT_STRUCTURAL + WEIGHT_CONFIDENCE;
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_components_derives_overall() {
        let b = ConsensusBreakdown::from_components(0.5, 0.7, 1.0, 0.8, 0.9);
        let expected = 0.35 * 0.5 + 0.25 * 0.7 + 0.15 * 1.0 + 0.10 * 0.8 + 0.15 * 0.9;
        assert!((b.overall_score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(ConsensusBucket::from_score(0.86), ConsensusBucket::Strong);
        assert_eq!(ConsensusBucket::from_score(0.85), ConsensusBucket::Partial);
        assert_eq!(ConsensusBucket::from_score(0.61), ConsensusBucket::Partial);
        assert_eq!(ConsensusBucket::from_score(0.6), ConsensusBucket::Weak);
    }
}
