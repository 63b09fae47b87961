//! Chairman selection and synthesis results.

use crate::consensus::text::normalize_tokens;
use crate::core::participant::Participant;
use crate::session::{Round, Session};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const ANALYTICAL_MARKERS: &[&str] = &[
    "why", "analyze", "analyse", "analysis", "ethical", "ethics", "moral", "morality", "should",
    "implications", "evaluate", "compare", "tradeoffs", "justify", "philosophy", "fair", "justice",
    "ético", "ética", "analizar", "debería",
];

const PROCEDURAL_MARKERS: &[&str] = &[
    "how", "steps", "step", "process", "procedure", "implement", "install", "configure", "setup",
    "what", "when", "who", "which", "fact", "facts", "data", "statistics", "history", "define",
    "cómo", "pasos", "proceso", "cuándo", "quién",
];

const CREATIVE_MARKERS: &[&str] = &[
    "imagine", "future", "futures", "predict", "prediction", "forecast", "creative", "design",
    "invent", "story", "vision", "innovate", "innovation", "scenario", "speculate", "futuro",
    "imagina", "crear", "diseño",
];

/// Pick the participant best suited to chair a synthesis of this session.
///
/// Analytical or ethical questions go to Claude, procedural or factual ones
/// to GPT, creative or forward-looking ones to Gemini. Anything else rotates
/// by the number of rounds played.
pub fn select_optimal_chairman(session: &Session) -> Participant {
    let tokens = normalize_tokens(session.question().content());
    let mentions = |markers: &[&str]| tokens.iter().any(|t| markers.contains(&t.as_str()));

    if mentions(ANALYTICAL_MARKERS) {
        Participant::Claude
    } else if mentions(PROCEDURAL_MARKERS) {
        Participant::Gpt
    } else if mentions(CREATIVE_MARKERS) {
        Participant::Gemini
    } else {
        Participant::ALL[session.rounds().len() % Participant::ALL.len()]
    }
}

/// A chairman's synthesis of one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisResult {
    pub chairman: Participant,
    pub round: usize,
    pub content: String,
    pub confidence: u8,
    pub model: String,
    pub agreement_points: Vec<String>,
    pub disagreement_points: Vec<String>,
    pub cost: f64,
    pub tokens_used: u64,
    pub created_at: DateTime<Utc>,
}

impl SynthesisResult {
    /// Carry the round's agreement and disagreement labels alongside the text
    pub fn new(
        chairman: Participant,
        round: &Round,
        content: String,
        confidence: u8,
        model: String,
        cost: f64,
        tokens_used: u64,
    ) -> Self {
        let breakdown = round.breakdown();
        Self {
            chairman,
            round: round.number(),
            content,
            confidence,
            model,
            agreement_points: breakdown.agreement_points.clone(),
            disagreement_points: breakdown.disagreement_labels(),
            cost,
            tokens_used,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::{ConsensusBreakdown, DisagreementPoint};
    use crate::core::question::Question;
    use crate::session::{AgentResponse, DebateSettings};

    fn session(question: &str) -> Session {
        Session::new(Question::new(question).unwrap(), None, DebateSettings::default()).unwrap()
    }

    #[test]
    fn test_analytical_routes_to_claude() {
        let s = session("Is it ethical to use AI for hiring decisions?");
        assert_eq!(select_optimal_chairman(&s), Participant::Claude);
    }

    #[test]
    fn test_procedural_routes_to_gpt() {
        let s = session("How do I configure a reverse proxy?");
        assert_eq!(select_optimal_chairman(&s), Participant::Gpt);
    }

    #[test]
    fn test_creative_routes_to_gemini() {
        let s = session("Imagine cities in the year 2200");
        assert_eq!(select_optimal_chairman(&s), Participant::Gemini);
    }

    #[test]
    fn test_round_robin_fallback() {
        let mut s = session("Tabs or spaces?");
        assert_eq!(select_optimal_chairman(&s), Participant::Claude);

        let responses = Participant::ALL
            .iter()
            .map(|p| AgentResponse::new(*p, "x", 75, p.default_model(), 0, 0.0))
            .collect();
        s.record_round(Round::new(1, responses, ConsensusBreakdown::default()).unwrap())
            .unwrap();
        assert_eq!(select_optimal_chairman(&s), Participant::Gpt);
    }

    #[test]
    fn test_synthesis_carries_labels() {
        let mut breakdown = ConsensusBreakdown::default();
        breakdown.agreement_points.push("All participants discuss: cost".into());
        breakdown.disagreement_points.push(DisagreementPoint {
            point: "Tone/attitude".into(),
            views: vec![],
        });
        let responses = Participant::ALL
            .iter()
            .map(|p| AgentResponse::new(*p, "x", 75, p.default_model(), 0, 0.0))
            .collect();
        let round = Round::new(2, responses, breakdown).unwrap();
        let result = SynthesisResult::new(
            Participant::Gemini,
            &round,
            "text".into(),
            80,
            "gemini-3-pro-preview".into(),
            0.02,
            500,
        );
        assert_eq!(result.round, 2);
        assert_eq!(result.agreement_points, vec!["All participants discuss: cost"]);
        assert_eq!(result.disagreement_points, vec!["Tone/attitude"]);
    }
}
