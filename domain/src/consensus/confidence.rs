//! Confidence extraction from free-form response text.
//!
//! Participants do not report calibrated confidence natively, so every
//! adapter runs the same heuristic over the returned text. That keeps the
//! number comparable across heterogeneous sources.

use regex::Regex;
use std::sync::LazyLock;

/// Confidence assigned when no explicit percentage and no marker imbalance exist
pub const DEFAULT_CONFIDENCE: u8 = 75;

const CERTAIN_CONFIDENCE: u8 = 85;
const HEDGED_CONFIDENCE: u8 = 60;

const CERTAINTY_MARKERS: &[&str] = &["definitely", "certainly", "absolutely", "clearly"];
const HEDGE_MARKERS: &[&str] = &["maybe", "perhaps", "possibly", "might", "could"];

/// "90% confident", "85 % sure", "100% certain"
static PERCENT_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,3}(?:\.\d+)?)\s*%\s*(?:confident|certain|sure)\b")
        .expect("valid percent-first regex")
});

/// "confident at 90%", "Confidence: 80%", "certainty of 70 %"
static WORD_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:confiden(?:t|ce)|certain(?:ty)?|sure)\b[^\d\n]{0,20}?(\d{1,3}(?:\.\d+)?)\s*%")
        .expect("valid word-first regex")
});

/// Extract a 0–100 confidence score from response text.
///
/// 1. An explicit `<N>% confident/certain/sure` (either word order) wins,
///    clamped to `[0, 100]`.
/// 2. Otherwise certainty markers are counted against hedge markers:
///    more certainty → 85, more hedging → 60, balanced → 75.
///
/// # Examples
///
/// ```
/// use debate_domain::consensus::extract_confidence;
///
/// assert_eq!(extract_confidence("I am 92% confident in this."), 92);
/// assert_eq!(extract_confidence("This is definitely and clearly true."), 85);
/// assert_eq!(extract_confidence("Perhaps it might work."), 60);
/// assert_eq!(extract_confidence("It works."), 75);
/// ```
pub fn extract_confidence(text: &str) -> u8 {
    if let Some(value) = explicit_percentage(text) {
        return value;
    }

    let words = lowercase_words(text);
    let certain = count_markers(&words, CERTAINTY_MARKERS);
    let hedged = count_markers(&words, HEDGE_MARKERS);

    match certain.cmp(&hedged) {
        std::cmp::Ordering::Greater => CERTAIN_CONFIDENCE,
        std::cmp::Ordering::Less => HEDGED_CONFIDENCE,
        std::cmp::Ordering::Equal => DEFAULT_CONFIDENCE,
    }
}

fn explicit_percentage(text: &str) -> Option<u8> {
    let captured = PERCENT_FIRST
        .captures(text)
        .or_else(|| WORD_FIRST.captures(text))?;
    let value: f64 = captured.get(1)?.as_str().parse().ok()?;
    Some(value.round().clamp(0.0, 100.0) as u8)
}

fn lowercase_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn count_markers(words: &[String], markers: &[&str]) -> usize {
    words
        .iter()
        .filter(|w| markers.contains(&w.as_str()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_percent_first() {
        assert_eq!(extract_confidence("I'm 80% sure about that."), 80);
        assert_eq!(extract_confidence("Roughly 64.6 % certain."), 65);
    }

    #[test]
    fn test_explicit_word_first() {
        assert_eq!(extract_confidence("Confidence: 70%"), 70);
        assert_eq!(extract_confidence("I am confident at about 55%."), 55);
    }

    #[test]
    fn test_explicit_is_clamped() {
        assert_eq!(extract_confidence("I am 250% confident"), 100);
    }

    #[test]
    fn test_explicit_beats_markers() {
        let text = "Maybe, perhaps, possibly. Still, 90% confident.";
        assert_eq!(extract_confidence(text), 90);
    }

    #[test]
    fn test_unrelated_percentage_is_ignored() {
        // A percentage that is not tied to a confidence word falls back to markers
        assert_eq!(extract_confidence("Inflation rose 5% last year."), DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_marker_balance() {
        assert_eq!(extract_confidence("Clearly this is right."), 85);
        assert_eq!(extract_confidence("It could be, maybe."), 60);
        assert_eq!(extract_confidence("Clearly it could fail."), 75);
    }

    #[test]
    fn test_markers_are_whole_words() {
        // "couldn't" splits into "couldn" + "t" and must not count as "could"
        assert_eq!(extract_confidence("Mighty rivers couldn't stop."), DEFAULT_CONFIDENCE);
    }
}
