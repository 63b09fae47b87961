//! Consensus scorer contract and the default lexical implementation.

use super::breakdown::{ConsensusBreakdown, DisagreementPoint, KeyDifference, ParticipantView};
use super::text::{
    StructureMetrics, extract_facts, keyword_profile, phrases, sentiment, shared_words,
    structure_metrics,
};
use crate::core::participant::Participant;
use std::collections::{BTreeSet, HashSet};
use std::hash::Hash;

/// Factual agreement reported when nobody states any fact
pub const NEUTRAL_FACTUAL_AGREEMENT: f64 = 0.7;

const MAX_AGREEMENT_PHRASES: usize = 5;
const MAX_SHARED_KEYWORDS: usize = 5;
const MAX_FOCUS_KEYWORDS: usize = 3;
const LOW_COMPONENT_SCORE: f64 = 0.5;

/// A participant's response as seen by the scorer
#[derive(Debug, Clone, Copy)]
pub struct ScorableResponse<'a> {
    pub participant: Participant,
    pub content: &'a str,
    pub confidence: u8,
}

impl<'a> ScorableResponse<'a> {
    pub fn new(participant: Participant, content: &'a str, confidence: u8) -> Self {
        Self {
            participant,
            content,
            confidence,
        }
    }
}

/// Grades one round of responses.
///
/// Implementations receive only the valid responses of a round (two or
/// three) and must return components in `[0, 1]`. Swapping the lexical
/// implementation for an embedding-based one only requires a new impl.
pub trait ConsensusScorer: Send + Sync {
    fn score(&self, responses: &[ScorableResponse<'_>]) -> ConsensusBreakdown;
}

/// Jaccard index `|A ∩ B| / |A ∪ B|`, `0` when both sets are empty.
///
/// # Examples
///
/// ```
/// use debate_domain::consensus::jaccard;
///
/// assert_eq!(jaccard(&["a", "b"], &["b", "a"]), 1.0);
/// assert_eq!(jaccard(&["a"], &["b"]), 0.0);
/// assert_eq!(jaccard::<&str>(&[], &[]), 0.0);
/// ```
pub fn jaccard<T: Eq + Hash>(a: &[T], b: &[T]) -> f64 {
    let a: HashSet<&T> = a.iter().collect();
    let b: HashSet<&T> = b.iter().collect();
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}

/// Keyword, fact, sentiment and shape heuristics; free to run, no model calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalConsensusScorer;

impl LexicalConsensusScorer {
    pub fn new() -> Self {
        Self
    }
}

/// Per-response features computed once and shared by every component
struct Features<'a> {
    participant: Participant,
    content: &'a str,
    confidence: f64,
    keywords: Vec<String>,
    facts: BTreeSet<String>,
    sentiment: f64,
    structure: StructureMetrics,
}

impl ConsensusScorer for LexicalConsensusScorer {
    fn score(&self, responses: &[ScorableResponse<'_>]) -> ConsensusBreakdown {
        let features: Vec<Features<'_>> = responses
            .iter()
            .map(|r| Features {
                participant: r.participant,
                content: r.content,
                confidence: f64::from(r.confidence),
                keywords: keyword_profile(r.content),
                facts: extract_facts(r.content),
                sentiment: sentiment(r.content),
                structure: structure_metrics(r.content),
            })
            .collect();

        let mut breakdown = ConsensusBreakdown::from_components(
            semantic_similarity(&features),
            factual_agreement(&features),
            tonal_alignment(&features),
            structural_similarity(&features),
            confidence_alignment(&features),
        );
        breakdown.agreement_points = agreement_points(&features);
        breakdown.disagreement_points = disagreement_points(&features);
        breakdown.key_differences = key_differences(&breakdown, &features);
        breakdown
    }
}

fn pairs<T>(items: &[T]) -> impl Iterator<Item = (&T, &T)> {
    items
        .iter()
        .enumerate()
        .flat_map(move |(i, a)| items[i + 1..].iter().map(move |b| (a, b)))
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

fn semantic_similarity(features: &[Features<'_>]) -> f64 {
    mean(pairs(features).map(|(a, b)| jaccard(&a.keywords, &b.keywords))).unwrap_or(0.0)
}

fn factual_agreement(features: &[Features<'_>]) -> f64 {
    let union: BTreeSet<&String> = features.iter().flat_map(|f| f.facts.iter()).collect();
    if union.is_empty() {
        return NEUTRAL_FACTUAL_AGREEMENT;
    }
    let shared = union
        .iter()
        .filter(|fact| features.iter().filter(|f| f.facts.contains(**fact)).count() >= 2)
        .count();
    shared as f64 / union.len() as f64
}

fn tonal_alignment(features: &[Features<'_>]) -> f64 {
    let mean_diff =
        mean(pairs(features).map(|(a, b)| (a.sentiment - b.sentiment).abs())).unwrap_or(0.0);
    (1.0 - mean_diff / 2.0).clamp(0.0, 1.0)
}

fn ratio_similarity(values: impl Iterator<Item = usize> + Clone) -> f64 {
    let max = values.clone().max().unwrap_or(0);
    if max == 0 {
        return 1.0;
    }
    let min = values.min().unwrap_or(0);
    min as f64 / max as f64
}

fn structural_similarity(features: &[Features<'_>]) -> f64 {
    let length = ratio_similarity(features.iter().map(|f| f.structure.length));
    let paragraphs = ratio_similarity(features.iter().map(|f| f.structure.paragraphs));
    let lists = ratio_similarity(features.iter().map(|f| f.structure.list_items));
    (length + paragraphs + lists) / 3.0
}

fn confidence_alignment(features: &[Features<'_>]) -> f64 {
    let Some(avg) = mean(features.iter().map(|f| f.confidence)) else {
        return 1.0;
    };
    let variance = mean(features.iter().map(|f| (f.confidence - avg).powi(2))).unwrap_or(0.0);
    (1.0 - variance.sqrt() / 50.0).max(0.0)
}

fn agreement_points(features: &[Features<'_>]) -> Vec<String> {
    let Some((first, others)) = features.split_first() else {
        return Vec::new();
    };
    let mut points = Vec::new();

    let other_phrases: Vec<Vec<Vec<String>>> = others.iter().map(|f| phrases(f.content)).collect();
    for phrase in phrases(first.content) {
        if points.len() >= MAX_AGREEMENT_PHRASES {
            break;
        }
        let everywhere = other_phrases
            .iter()
            .all(|set| set.iter().any(|candidate| shared_words(&phrase, candidate) >= 2));
        let joined = phrase.join(" ");
        if everywhere && !points.contains(&joined) {
            points.push(joined);
        }
    }

    let shared_keywords: Vec<&String> = first
        .keywords
        .iter()
        .filter(|k| others.iter().all(|f| f.keywords.contains(k)))
        .take(MAX_SHARED_KEYWORDS)
        .collect();
    if !shared_keywords.is_empty() {
        let list = shared_keywords
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        points.push(format!("All participants discuss: {list}"));
    }

    points
}

fn tone_label(sentiment: f64) -> &'static str {
    if sentiment > 0.3 {
        "positive"
    } else if sentiment < -0.3 {
        "skeptical"
    } else {
        "neutral"
    }
}

fn disagreement_points(features: &[Features<'_>]) -> Vec<DisagreementPoint> {
    let mut points = Vec::new();

    let max_tone_gap = pairs(features)
        .map(|(a, b)| (a.sentiment - b.sentiment).abs())
        .fold(0.0_f64, f64::max);
    if max_tone_gap > 0.5 {
        points.push(DisagreementPoint {
            point: "Tone/attitude".to_string(),
            views: features
                .iter()
                .map(|f| ParticipantView {
                    participant: f.participant,
                    view: tone_label(f.sentiment).to_string(),
                })
                .collect(),
        });
    }

    let unique: Vec<Vec<&String>> = features
        .iter()
        .enumerate()
        .map(|(i, f)| {
            f.keywords
                .iter()
                .filter(|k| {
                    features
                        .iter()
                        .enumerate()
                        .all(|(j, other)| j == i || !other.keywords.contains(k))
                })
                .collect()
        })
        .collect();
    if unique.iter().any(|u| u.len() > 2) {
        points.push(DisagreementPoint {
            point: "Focus areas".to_string(),
            views: features
                .iter()
                .zip(&unique)
                .map(|(f, u)| ParticipantView {
                    participant: f.participant,
                    view: if u.is_empty() {
                        "no distinctive focus".to_string()
                    } else {
                        format!(
                            "emphasizes {}",
                            u.iter()
                                .take(MAX_FOCUS_KEYWORDS)
                                .map(|k| k.as_str())
                                .collect::<Vec<_>>()
                                .join(", ")
                        )
                    },
                })
                .collect(),
        });
    }

    points
}

fn key_differences(breakdown: &ConsensusBreakdown, features: &[Features<'_>]) -> Vec<KeyDifference> {
    let mut differences = Vec::new();

    if breakdown.semantic_similarity < LOW_COMPONENT_SCORE {
        differences.push(KeyDifference::new(
            "semantic",
            "Participants frame the answer around different concepts and vocabulary.",
        ));
    }
    if breakdown.factual_agreement < LOW_COMPONENT_SCORE {
        differences.push(KeyDifference::new(
            "factual",
            "Participants cite different figures, dates or amounts.",
        ));
    }
    if breakdown.tonal_alignment < LOW_COMPONENT_SCORE {
        differences.push(KeyDifference::new(
            "tonal",
            "Participants differ in attitude: some are optimistic while others are skeptical.",
        ));
    }
    if breakdown.confidence_alignment < LOW_COMPONENT_SCORE {
        differences.push(KeyDifference::new(
            "confidence",
            "Participants express markedly different levels of certainty.",
        ));
    }

    let lengths = features.iter().map(|f| f.structure.length);
    if let (Some(longest), Some(shortest)) = (lengths.clone().max(), lengths.min())
        && longest > shortest * 2
    {
        differences.push(KeyDifference::new(
            "scope",
            "Responses differ widely in length, suggesting different scope or depth of coverage.",
        ));
    }

    differences
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn score(texts: [&str; 3], confidences: [u8; 3]) -> ConsensusBreakdown {
        let responses: Vec<ScorableResponse<'_>> = Participant::ALL
            .iter()
            .zip(texts)
            .zip(confidences)
            .map(|((p, t), c)| ScorableResponse::new(*p, t, c))
            .collect();
        LexicalConsensusScorer::new().score(&responses)
    }

    #[test]
    fn test_identical_responses_score_high() {
        let text = "Renewable energy adoption reduces emissions and lowers long term costs.";
        let b = score([text, text, text], [80, 80, 80]);
        assert_eq!(b.semantic_similarity, 1.0);
        assert_eq!(b.structural_similarity, 1.0);
        assert_eq!(b.confidence_alignment, 1.0);
        assert_eq!(b.factual_agreement, NEUTRAL_FACTUAL_AGREEMENT);
        assert!(b.overall_score > 0.9);
        assert!(b.key_differences.is_empty());
    }

    #[test]
    fn test_factual_neutral_without_facts() {
        let b = score(
            ["Cats are independent.", "Dogs are loyal.", "Birds can fly."],
            [75, 75, 75],
        );
        assert_eq!(b.factual_agreement, 0.7);
    }

    #[test]
    fn test_single_fact_from_one_participant_scores_zero() {
        let b = score(
            [
                "The project would cost about $50,000 overall.",
                "The project seems reasonable overall.",
                "The project is worth doing overall.",
            ],
            [75, 75, 75],
        );
        assert_eq!(b.factual_agreement, 0.0);
    }

    #[test]
    fn test_shared_facts_count() {
        let b = score(
            [
                "Founded in 1998 with 40% share.",
                "Founded in 1998, it holds 40% today.",
                "It started in 1998.",
            ],
            [75, 75, 75],
        );
        // union: 1998, 40%, 40: all mentioned by at least two participants
        assert_eq!(b.factual_agreement, 1.0);
    }

    #[test]
    fn test_multilingual_positive_tone_aligns() {
        let b = score(
            [
                "This is a great and beneficial idea.",
                "Es una idea excelente y muy útil.",
                "A promising and valuable approach.",
            ],
            [75, 75, 75],
        );
        assert_eq!(b.tonal_alignment, 1.0);
        assert!(b.disagreement_points.iter().all(|d| d.point != "Tone/attitude"));
    }

    #[test]
    fn test_opposing_tone_creates_disagreement_point() {
        let b = score(
            [
                "Nuclear power is safe, efficient and beneficial.",
                "Nuclear power is dangerous, costly and harmful.",
                "Nuclear power is a topic.",
            ],
            [75, 75, 75],
        );
        let tone = b
            .disagreement_points
            .iter()
            .find(|d| d.point == "Tone/attitude")
            .expect("tone disagreement");
        assert_eq!(tone.views[0].view, "positive");
        assert_eq!(tone.views[1].view, "skeptical");
        assert_eq!(tone.views[2].view, "neutral");
        assert!(b.tonal_alignment < 1.0);
    }

    #[test]
    fn test_confidence_alignment_spread() {
        let b = score(["Same text here.", "Same text here.", "Same text here."], [100, 0, 50]);
        // population stddev of (100, 0, 50) = 40.82..., 1 - 40.82/50 = 0.1835...
        assert!((b.confidence_alignment - (1.0 - (5000.0_f64 / 3.0).sqrt() / 50.0)).abs() < 1e-9);
    }

    #[test]
    fn test_focus_areas_disagreement() {
        let b = score(
            [
                "Economics inflation taxation budgets dominate.",
                "Ecology forests rivers wildlife dominate.",
                "Technology robots software automation dominate.",
            ],
            [75, 75, 75],
        );
        let focus = b
            .disagreement_points
            .iter()
            .find(|d| d.point == "Focus areas")
            .expect("focus disagreement");
        assert_eq!(focus.views.len(), 3);
        assert!(focus.views[0].view.starts_with("emphasizes economics"));
    }

    #[test]
    fn test_agreement_points_shared_keywords() {
        let b = score(
            [
                "Renewable energy reduces carbon emissions significantly.",
                "Carbon emissions drop when renewable energy expands.",
                "Expanding renewable energy cuts carbon emissions.",
            ],
            [75, 75, 75],
        );
        let note = b
            .agreement_points
            .iter()
            .find(|p| p.starts_with("All participants discuss:"))
            .expect("shared keyword note");
        assert!(note.contains("renewable"));
        assert!(note.contains("carbon"));
    }

    #[test]
    fn test_scope_difference_note() {
        let long = "word ".repeat(100);
        let b = score([&long, "short answer", "short reply"], [75, 75, 75]);
        assert!(b.key_differences.iter().any(|d| d.dimension == "scope"));
    }

    #[test]
    fn test_two_responses_are_scored() {
        let responses = [
            ScorableResponse::new(Participant::Claude, "Solar is cheap and clean.", 80),
            ScorableResponse::new(Participant::Gemini, "Solar is cheap and clean.", 80),
        ];
        let b = LexicalConsensusScorer::new().score(&responses);
        assert_eq!(b.semantic_similarity, 1.0);
        assert_eq!(b.confidence_alignment, 1.0);
    }

    proptest! {
        #[test]
        fn prop_jaccard_symmetric_and_bounded(
            a in prop::collection::vec("[a-e]{1,3}", 0..8),
            b in prop::collection::vec("[a-e]{1,3}", 0..8),
        ) {
            let ab = jaccard(&a, &b);
            let ba = jaccard(&b, &a);
            prop_assert_eq!(ab, ba);
            prop_assert!((0.0..=1.0).contains(&ab));
        }

        #[test]
        fn prop_jaccard_identity(a in prop::collection::vec("[a-z]{1,4}", 1..8)) {
            prop_assert_eq!(jaccard(&a, &a), 1.0);
        }

        #[test]
        fn prop_overall_is_weighted_sum(
            t1 in "[a-z $%0-9.\n-]{0,80}",
            t2 in "[a-z $%0-9.\n-]{0,80}",
            t3 in "[a-z $%0-9.\n-]{0,80}",
            c1 in 0u8..=100, c2 in 0u8..=100, c3 in 0u8..=100,
        ) {
            let b = score([&t1, &t2, &t3], [c1, c2, c3]);
            let expected = 0.35 * b.semantic_similarity
                + 0.25 * b.factual_agreement
                + 0.15 * b.tonal_alignment
                + 0.10 * b.structural_similarity
                + 0.15 * b.confidence_alignment;
            prop_assert!((b.overall_score - expected).abs() < 1e-9);
            for component in [
                b.overall_score,
                b.semantic_similarity,
                b.factual_agreement,
                b.tonal_alignment,
                b.structural_similarity,
                b.confidence_alignment,
            ] {
                prop_assert!((0.0..=1.0).contains(&component));
            }
        }

        #[test]
        fn prop_confidence_alignment_floored(c1 in 0u8..=100, c2 in 0u8..=100, c3 in 0u8..=100) {
            let b = score(["x", "x", "x"], [c1, c2, c3]);
            prop_assert!(b.confidence_alignment >= 0.0);
            if c1 == c2 && c2 == c3 {
                prop_assert_eq!(b.confidence_alignment, 1.0);
            }
        }
    }

    #[test]
    fn test_jaccard_disjoint_non_empty() {
        assert_eq!(jaccard(&["x", "y"], &["z"]), 0.0);
    }
}
