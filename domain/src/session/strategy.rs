//! Debate strategy: how rounds after the first are steered.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

const CONSENSUS_INSTRUCTIONS: [&str; 3] = [
    "Read the other participants' answers carefully. Point out where you agree, where you \
     disagree, and refine your own answer accordingly.",
    "Focus on the remaining points of disagreement. Concede where another participant's \
     reasoning is better supported and state clearly what you still dispute and why.",
    "Work toward a final shared answer. Keep only the claims you are prepared to defend and \
     make any remaining disagreement explicit.",
];

const ADVERSARIAL_INSTRUCTIONS: [&str; 3] = [
    "Critically examine the other participants' answers. Identify unsupported claims, \
     missing considerations and factual errors, then restate your own position.",
    "Challenge the strongest counter-argument to your position and respond to the \
     criticisms raised against you. Correct yourself where you were wrong.",
    "Having stress-tested each position, give your final answer and state which \
     objections you accept and which you still reject.",
];

/// How later rounds instruct the participants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Converge: concede well-supported points and look for common ground
    #[default]
    Consensus,
    /// Stress-test: challenge each other's claims before converging
    Adversarial,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Consensus => "consensus",
            Strategy::Adversarial => "adversarial",
        }
    }

    /// Instruction for a round ≥ 2. Rounds past the defined set reuse the last one.
    pub fn round_instruction(&self, round_number: usize) -> &'static str {
        let set = match self {
            Strategy::Consensus => &CONSENSUS_INSTRUCTIONS,
            Strategy::Adversarial => &ADVERSARIAL_INSTRUCTIONS,
        };
        let index = round_number.saturating_sub(2).min(set.len() - 1);
        set[index]
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Strategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "consensus" | "collaborative" => Ok(Strategy::Consensus),
            "adversarial" | "debate" => Ok(Strategy::Adversarial),
            other => Err(DomainError::InvalidInput(format!(
                "unknown strategy '{other}' (expected consensus or adversarial)"
            ))),
        }
    }
}
