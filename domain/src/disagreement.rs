//! Deadlock analysis: what kind of disagreement remains and whether a human
//! can plausibly break it.

use crate::budget::check_budget_limit;
use crate::consensus::text::{extract_facts, normalize_tokens};
use crate::core::participant::Participant;
use crate::core::string::{sentences, truncate_chars};
use crate::session::{Round, Session, SessionStatus};
use serde::{Deserialize, Serialize};

/// Confidence at or above which a numeric or truth-valued claim counts as asserted
const ASSERTIVE_CONFIDENCE: u8 = 70;
const MIN_KEY_SENTENCE_CHARS: usize = 20;
const KEY_DIFFERENCE_CHARS: usize = 100;
const CORE_CONFLICT_CHARS: usize = 240;
const POSITION_SUMMARY_CHARS: usize = 200;

const GENERIC_CONFLICT: &str =
    "The participants reach different conclusions without naming a single point of contention.";

const TRUTH_MARKERS: &[&str] = &[
    "fact", "facts", "proven", "evidence", "data", "statistics", "statistically", "true", "false",
    "incorrect", "inaccurate", "measured", "documented", "hecho", "datos", "evidencia", "falso",
    "verdadero",
];

const SUBJECTIVE_MARKERS: &[&str] = &[
    "should", "ought", "moral", "morally", "ethical", "ethics", "ethically", "values", "believe",
    "fair", "unfair", "justice", "virtue", "meaning", "subjective", "opinion", "deberia", "debería",
    "moralmente", "ético", "ética", "justicia", "valores", "creo",
];

const CONTRAST_CONNECTIVES: &[&str] = &[
    "however", "but", "although", "though", "whereas", "nevertheless", "nonetheless", "yet",
    "conversely", "pero", "aunque", "embargo", "mientras",
];

/// Kind of disagreement left after the last round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisagreementType {
    Factual,
    Interpretive,
    Philosophical,
}

impl DisagreementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisagreementType::Factual => "factual",
            DisagreementType::Interpretive => "interpretive",
            DisagreementType::Philosophical => "philosophical",
        }
    }

    fn baseline_resolvability(&self) -> i32 {
        match self {
            DisagreementType::Factual => 8,
            DisagreementType::Interpretive => 6,
            DisagreementType::Philosophical => 4,
        }
    }
}

impl std::fmt::Display for DisagreementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisagreementReport {
    pub core_conflict: String,
    pub disagreement_type: DisagreementType,
    /// 1 (entrenched) ..= 10 (easily settled)
    pub resolvability_score: u8,
    pub key_differences: Vec<String>,
}

/// Classify the disagreement in a round. Error sentinels are ignored.
pub fn analyze(round: &Round) -> DisagreementReport {
    let valid: Vec<_> = round.valid_responses().collect();

    let disagreement_type = if valid.iter().any(|r| {
        r.confidence >= ASSERTIVE_CONFIDENCE
            && (!extract_facts(&r.content).is_empty() || contains_any(&r.content, TRUTH_MARKERS))
    }) {
        DisagreementType::Factual
    } else if valid.iter().any(|r| contains_any(&r.content, SUBJECTIVE_MARKERS)) {
        DisagreementType::Philosophical
    } else {
        DisagreementType::Interpretive
    };

    let mean_confidence = if valid.is_empty() {
        0.0
    } else {
        valid.iter().map(|r| f64::from(r.confidence)).sum::<f64>() / valid.len() as f64
    };
    let mut resolvability = disagreement_type.baseline_resolvability();
    if mean_confidence < 60.0 {
        resolvability += 2;
    } else if mean_confidence > 85.0 {
        resolvability -= 1;
    }

    let core_conflict = valid
        .iter()
        .flat_map(|r| sentences(&r.content))
        .find(|s| contains_any(s, CONTRAST_CONNECTIVES))
        .map(|s| truncate_chars(s, CORE_CONFLICT_CHARS))
        .unwrap_or_else(|| GENERIC_CONFLICT.to_string());

    let key_differences = valid
        .iter()
        .filter_map(|r| {
            sentences(&r.content)
                .into_iter()
                .find(|s| s.chars().count() > MIN_KEY_SENTENCE_CHARS)
                .map(|s| {
                    format!(
                        "{}: {}",
                        r.participant.display_name(),
                        truncate_chars(s, KEY_DIFFERENCE_CHARS)
                    )
                })
        })
        .collect();

    DisagreementReport {
        core_conflict,
        disagreement_type,
        resolvability_score: resolvability.clamp(1, 10) as u8,
        key_differences,
    }
}

fn contains_any(text: &str, markers: &[&str]) -> bool {
    normalize_tokens(text)
        .iter()
        .any(|token| markers.contains(&token.as_str()))
}

/// One participant's standing position, as shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantPosition {
    pub participant: Participant,
    pub summary: String,
    pub confidence: u8,
}

/// A way out of a deadlock the user may choose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "option", rename_all = "snake_case")]
pub enum InterventionOption {
    ContinueWithGuidance,
    /// Resume with a higher budget cap; offered instead of plain resume once
    /// the cap is spent
    RaiseBudget,
    AcceptAnswer { participant: Participant },
    ManualResolve,
    RequestPeerReview,
    RequestSynthesis,
}

/// Everything a caller needs to ask a human how to proceed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanInterventionRequest {
    pub session_id: String,
    pub status: SessionStatus,
    pub round: usize,
    pub consensus_score: f64,
    pub report: DisagreementReport,
    pub positions: Vec<ParticipantPosition>,
    pub options: Vec<InterventionOption>,
}

impl HumanInterventionRequest {
    /// Build a request from the latest round; `None` before any round exists.
    pub fn from_session(session: &Session) -> Option<Self> {
        let round = session.latest_round()?;
        let positions: Vec<ParticipantPosition> = round
            .valid_responses()
            .map(|r| ParticipantPosition {
                participant: r.participant,
                summary: truncate_chars(r.content.trim(), POSITION_SUMMARY_CHARS),
                confidence: r.confidence,
            })
            .collect();

        let mut options =
            if check_budget_limit(session.current_cost(), session.max_cost()).within_budget {
                vec![InterventionOption::ContinueWithGuidance]
            } else {
                vec![InterventionOption::RaiseBudget]
            };
        options.extend(positions.iter().map(|p| InterventionOption::AcceptAnswer {
            participant: p.participant,
        }));
        options.extend([
            InterventionOption::ManualResolve,
            InterventionOption::RequestPeerReview,
            InterventionOption::RequestSynthesis,
        ]);

        Some(Self {
            session_id: session.id().to_string(),
            status: session.status(),
            round: round.number(),
            consensus_score: round.consensus_score(),
            report: analyze(round),
            positions,
            options,
        })
    }
}
