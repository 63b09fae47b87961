//! Participant value object representing one of the three debaters

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Model tag used by sentinel responses for a participant that failed
pub const ERROR_MODEL_TAG: &str = "error";

/// The three fixed debate participants (Value Object)
///
/// Each participant is an independent text-generation identity. The set is
/// closed: every round carries exactly one response slot per participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Participant {
    Claude,
    Gpt,
    Gemini,
}

impl Participant {
    /// All participants in their stable canonical order
    pub const ALL: [Participant; 3] = [Participant::Claude, Participant::Gpt, Participant::Gemini];

    /// Get the string identifier for this participant
    pub fn as_str(&self) -> &'static str {
        match self {
            Participant::Claude => "claude",
            Participant::Gpt => "gpt",
            Participant::Gemini => "gemini",
        }
    }

    /// Human-readable name used in prompts and reports
    pub fn display_name(&self) -> &'static str {
        match self {
            Participant::Claude => "Claude",
            Participant::Gpt => "GPT",
            Participant::Gemini => "Gemini",
        }
    }

    /// Default model identifier used when no override is configured
    pub fn default_model(&self) -> &'static str {
        match self {
            Participant::Claude => "claude-sonnet-4.5",
            Participant::Gpt => "gpt-5.2",
            Participant::Gemini => "gemini-3-pro-preview",
        }
    }

    /// Position of this participant in [`Participant::ALL`]
    pub fn index(&self) -> usize {
        match self {
            Participant::Claude => 0,
            Participant::Gpt => 1,
            Participant::Gemini => 2,
        }
    }
}

impl std::fmt::Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Participant {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "claude" | "anthropic" => Ok(Participant::Claude),
            "gpt" | "openai" | "chatgpt" => Ok(Participant::Gpt),
            "gemini" | "google" => Ok(Participant::Gemini),
            other => Err(DomainError::UnknownParticipant(other.to_string())),
        }
    }
}
