//! Reviewer reply parsing. Never fails: template, then mention order, then
//! a fixed default ranking.

use super::anonymize::ReviewLabel;
use crate::core::participant::Participant;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static RANKING_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\branking\s*:").expect("valid ranking header regex"));

static RANKING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(\d)[ \t]*[.):\-][ \t]*\**(?:response[ \t]+)?\**((?-i:[ABC]))\b")
        .expect("valid ranking line regex")
});

static LABEL_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([ABC])\b").expect("valid label mention regex"));

/// Words that make a sentence-initial "A" read as a label rather than an article
const LABEL_PREDICATES: &[&str] = &[
    "is", "was", "has", "had", "and", "or", "wins", "ranks", "seems", "comes", "does", "beats",
    "gives", "offers", "provides", "edges", "leads",
];

static BEST_ASPECTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)best aspects\s*:\s*(.*?)(?:\n\s*improvements\s*:|\z)")
        .expect("valid best aspects regex")
});

static IMPROVEMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)improvements\s*:\s*(.*)\z").expect("valid improvements regex")
});

/// How a reviewer's ranking was recovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMethod {
    Template,
    MentionOrder,
    Default,
}

/// One reviewer's ordering of the anonymized labels, best first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewerRanking {
    pub reviewer: Participant,
    pub ranking: Vec<ReviewLabel>,
    pub method: ParseMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_aspects: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improvements: Option<String>,
}

impl ReviewerRanking {
    /// 1-based position of a label in this ranking
    pub fn position(&self, label: ReviewLabel) -> Option<usize> {
        self.ranking.iter().position(|l| *l == label).map(|i| i + 1)
    }
}

/// Parse a reviewer reply into a full ranking over `labels`.
pub fn parse_review(reviewer: Participant, text: &str, labels: &[ReviewLabel]) -> ReviewerRanking {
    let (ranking, method) = match template_ranking(text, labels) {
        Some(ranking) => (ranking, ParseMethod::Template),
        None => match mention_ranking(text, labels) {
            Some(ranking) => (ranking, ParseMethod::MentionOrder),
            None => (labels.to_vec(), ParseMethod::Default),
        },
    };

    ReviewerRanking {
        reviewer,
        ranking,
        method,
        best_aspects: section(&BEST_ASPECTS, text),
        improvements: section(&IMPROVEMENTS, text),
    }
}

fn template_ranking(text: &str, labels: &[ReviewLabel]) -> Option<Vec<ReviewLabel>> {
    let start = RANKING_HEADER.find(text)?.end();
    let mut ranked: Vec<(u32, ReviewLabel)> = RANKING_LINE
        .captures_iter(&text[start..])
        .filter_map(|caps| {
            let position = caps.get(1)?.as_str().parse().ok()?;
            let label = ReviewLabel::from_letter(caps.get(2)?.as_str())?;
            Some((position, label))
        })
        .collect();
    ranked.sort_by_key(|(position, _)| *position);

    let mut ranking: Vec<ReviewLabel> = Vec::with_capacity(labels.len());
    for (_, label) in ranked {
        if labels.contains(&label) && !ranking.contains(&label) {
            ranking.push(label);
        }
    }
    (ranking.len() == labels.len()).then_some(ranking)
}

fn mention_ranking(text: &str, labels: &[ReviewLabel]) -> Option<Vec<ReviewLabel>> {
    let mut ranking: Vec<ReviewLabel> = Vec::with_capacity(labels.len());
    for caps in LABEL_MENTION.captures_iter(text) {
        let Some(mention) = caps.get(1) else {
            continue;
        };
        if is_article(text, mention.start(), mention.end()) {
            continue;
        }
        if let Some(label) = ReviewLabel::from_letter(mention.as_str())
            && labels.contains(&label)
            && !ranking.contains(&label)
        {
            ranking.push(label);
        }
    }
    if ranking.is_empty() {
        return None;
    }
    for label in labels {
        if !ranking.contains(label) {
            ranking.push(*label);
        }
    }
    Some(ranking)
}

/// A sentence-initial "A" followed by a lowercase word ("A clear winner")
fn is_article(text: &str, start: usize, end: usize) -> bool {
    if &text[start..end] != "A" {
        return false;
    }
    let before = text[..start].trim_end_matches([' ', '\t']);
    let sentence_start = before.is_empty() || before.ends_with(['.', '!', '?', '\n']);
    if !sentence_start {
        return false;
    }
    let next: String = text[end..]
        .trim_start_matches([' ', '\t'])
        .chars()
        .take_while(|c| c.is_alphabetic())
        .collect();
    next.chars().next().is_some_and(char::is_lowercase)
        && !LABEL_PREDICATES.contains(&next.as_str())
}

fn section(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReviewLabel::*;

    const ALL: [ReviewLabel; 3] = [A, B, C];

    #[test]
    fn test_template_reply() {
        let reply = "RANKING:\n1. Response B\n2. Response C\n3. Response A\n\n\
                     BEST ASPECTS:\nB cites sources.\n\nIMPROVEMENTS:\nA should be shorter.";
        let ranking = parse_review(Participant::Claude, reply, &ALL);
        assert_eq!(ranking.method, ParseMethod::Template);
        assert_eq!(ranking.ranking, vec![B, C, A]);
        assert_eq!(ranking.best_aspects.as_deref(), Some("B cites sources."));
        assert_eq!(ranking.improvements.as_deref(), Some("A should be shorter."));
        assert_eq!(ranking.position(A), Some(3));
    }

    #[test]
    fn test_template_with_markdown_and_out_of_order_lines() {
        let reply = "**Ranking:**\n2) **Response A**\n1) **Response C**\n3) **Response B**";
        let ranking = parse_review(Participant::Gpt, reply, &ALL);
        assert_eq!(ranking.method, ParseMethod::Template);
        assert_eq!(ranking.ranking, vec![C, A, B]);
    }

    #[test]
    fn test_mention_order_fallback() {
        let reply = "I liked A the most, B was decent and C missed the point.";
        let ranking = parse_review(Participant::Gemini, reply, &ALL);
        assert_eq!(ranking.method, ParseMethod::MentionOrder);
        assert_eq!(ranking.ranking, vec![A, B, C]);
        assert_eq!(ranking.position(A), Some(1));
        assert_eq!(ranking.position(B), Some(2));
        assert_eq!(ranking.position(C), Some(3));
    }

    #[test]
    fn test_leading_article_is_not_a_label() {
        let reply = "A clear winner is C, followed by B and then A.";
        let ranking = parse_review(Participant::Gemini, reply, &ALL);
        assert_eq!(ranking.method, ParseMethod::MentionOrder);
        assert_eq!(ranking.ranking, vec![C, B, A]);

        let reply = "Hard call. A solid case is made by B. C rambles.";
        let ranking = parse_review(Participant::Gemini, reply, &ALL);
        assert_eq!(ranking.ranking, vec![B, C, A]);
    }

    #[test]
    fn test_sentence_initial_label_still_counts() {
        let reply = "A is the strongest. Then C, then B.";
        let ranking = parse_review(Participant::Claude, reply, &ALL);
        assert_eq!(ranking.ranking, vec![A, C, B]);

        let reply = "Response A wins. B and C trail.";
        let ranking = parse_review(Participant::Claude, reply, &ALL);
        assert_eq!(ranking.ranking, vec![A, B, C]);
    }

    #[test]
    fn test_incomplete_template_falls_back_to_mentions() {
        let reply = "Ranking:\n1. Response C\nThe rest are comparable, though B edges out A.";
        let ranking = parse_review(Participant::Claude, reply, &ALL);
        assert_eq!(ranking.method, ParseMethod::MentionOrder);
        assert_eq!(ranking.ranking, vec![C, B, A]);
    }

    #[test]
    fn test_partial_mentions_append_missing_labels() {
        let reply = "Only C is convincing.";
        let ranking = parse_review(Participant::Claude, reply, &ALL);
        assert_eq!(ranking.ranking, vec![C, A, B]);
    }

    #[test]
    fn test_default_ranking_when_nothing_parses() {
        let ranking = parse_review(Participant::Gpt, "they are all fine", &ALL);
        assert_eq!(ranking.method, ParseMethod::Default);
        assert_eq!(ranking.ranking, vec![A, B, C]);
        assert!(ranking.best_aspects.is_none());
    }

    #[test]
    fn test_two_label_review_ignores_unknown_label() {
        let reply = "RANKING:\n1. Response C\n2. Response B\n3. Response A";
        let ranking = parse_review(Participant::Gpt, reply, &[A, B]);
        assert_eq!(ranking.method, ParseMethod::Template);
        assert_eq!(ranking.ranking, vec![B, A]);
    }
}
