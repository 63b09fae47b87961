use crate::core::error::DomainError;
use crate::core::participant::Participant;
use crate::session::Round;
use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static BRAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:claude(?:[- ](?:\d[\w.]*|opus|sonnet|haiku))?|anthropic|chatgpt|gpt(?:-?\d[\w.]*)?|openai|gemini(?:[- ](?:\d[\w.]*|pro|flash|ultra))?|google|deepmind|bard)\b",
    )
    .expect("valid brand regex")
});

static SELF_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bas an ai(?: language)?(?: model| assistant)?\b[,.]?\s*")
        .expect("valid self-reference regex")
});

const BRAND_PLACEHOLDER: &str = "[model]";

/// Opaque label shown to reviewers in place of a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReviewLabel {
    A,
    B,
    C,
}

impl ReviewLabel {
    pub const ALL: [ReviewLabel; 3] = [ReviewLabel::A, ReviewLabel::B, ReviewLabel::C];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewLabel::A => "A",
            ReviewLabel::B => "B",
            ReviewLabel::C => "C",
        }
    }

    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "A" | "a" => Some(ReviewLabel::A),
            "B" | "b" => Some(ReviewLabel::B),
            "C" | "c" => Some(ReviewLabel::C),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReviewLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnonymizedResponse {
    pub label: ReviewLabel,
    pub content: String,
}

/// Shuffled, scrubbed responses plus the private label mapping
#[derive(Debug, Clone)]
pub struct Anonymization {
    responses: Vec<AnonymizedResponse>,
    mapping: Vec<(ReviewLabel, Participant)>,
}

impl Anonymization {
    /// Responses in label order, safe to show to any participant
    pub fn responses(&self) -> &[AnonymizedResponse] {
        &self.responses
    }

    pub fn labels(&self) -> Vec<ReviewLabel> {
        self.responses.iter().map(|r| r.label).collect()
    }

    pub fn participant_for(&self, label: ReviewLabel) -> Option<Participant> {
        self.mapping
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, p)| *p)
    }

    pub fn label_for(&self, participant: Participant) -> Option<ReviewLabel> {
        self.mapping
            .iter()
            .find(|(_, p)| *p == participant)
            .map(|(l, _)| *l)
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

/// Remove provider names and "as an AI" self references from a response
pub fn scrub_identity(text: &str) -> String {
    let without_self = SELF_REFERENCE.replace_all(text, "");
    BRAND.replace_all(&without_self, BRAND_PLACEHOLDER).into_owned()
}

/// Shuffle the round's valid responses and assign labels A, B, C in order.
///
/// Error sentinels are left out; at least two valid responses are required.
pub fn anonymize<R: Rng + ?Sized>(round: &Round, rng: &mut R) -> Result<Anonymization, DomainError> {
    let mut entries: Vec<(Participant, &str)> = round
        .valid_responses()
        .map(|r| (r.participant, r.content.as_str()))
        .collect();
    if entries.len() < 2 {
        return Err(DomainError::InvalidInput(format!(
            "round {} has fewer than two valid responses to review",
            round.number()
        )));
    }
    entries.shuffle(rng);

    let (responses, mapping) = ReviewLabel::ALL
        .iter()
        .zip(entries)
        .map(|(label, (participant, content))| {
            (
                AnonymizedResponse {
                    label: *label,
                    content: scrub_identity(content),
                },
                (*label, participant),
            )
        })
        .unzip();

    Ok(Anonymization { responses, mapping })
}
