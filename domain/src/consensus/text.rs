//! Lexical text features used by the consensus scorer.
//!
//! All functions are pure and language-light: lexicons cover English and
//! Spanish, and tokenization keeps accented letters intact.

use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

/// Number of keywords kept in a participant's keyword profile
pub const KEYWORD_PROFILE_SIZE: usize = 20;

const STOPWORDS: &[&str] = &[
    // English
    "about", "above", "after", "again", "also", "because", "been", "before", "being", "below",
    "between", "both", "could", "does", "doing", "down", "during", "each", "even", "from",
    "further", "have", "having", "here", "into", "just", "like", "many", "more", "most", "much",
    "must", "only", "other", "over", "same", "should", "some", "such", "than", "that", "their",
    "them", "then", "there", "these", "they", "this", "those", "through", "under", "until",
    "very", "were", "what", "when", "where", "which", "while", "with", "would", "your", "will",
    "into", "onto", "however", "therefore", "although", "might", "maybe", "perhaps",
    // Spanish
    "algo", "ante", "antes", "como", "con", "contra", "cual", "cuando", "desde", "donde",
    "durante", "ella", "ellas", "ellos", "entre", "esta", "este", "esto", "estos", "estas",
    "hace", "hacia", "hasta", "mismo", "mucho", "muy", "nada", "nosotros", "otra", "otro",
    "para", "pero", "poco", "porque", "puede", "pueden", "según", "sido", "siempre", "sobre",
    "también", "tanto", "tiene", "tienen", "todo", "todos", "través", "una", "unas", "unos",
    "aunque", "embargo", "más", "menos", "sólo", "solo",
];

const POSITIVE_WORDS: &[&str] = &[
    // English
    "good", "great", "excellent", "beneficial", "benefit", "benefits", "positive", "advantage",
    "advantages", "effective", "success", "successful", "improve", "improves", "improvement",
    "helpful", "valuable", "strong", "promising", "safe", "efficient", "best", "better",
    "useful", "opportunity", "favorable", "recommended",
    // Spanish
    "bueno", "buena", "buenos", "buenas", "excelente", "beneficioso", "beneficiosa",
    "beneficio", "positivo", "positiva", "ventaja", "ventajas", "eficaz", "eficiente", "éxito",
    "exitoso", "mejora", "mejor", "útil", "valioso", "valiosa", "prometedor", "seguro",
    "oportunidad", "favorable", "recomendable",
];

const NEGATIVE_WORDS: &[&str] = &[
    // English
    "bad", "poor", "negative", "harmful", "harm", "risk", "risks", "risky", "problem",
    "problems", "problematic", "disadvantage", "disadvantages", "fail", "fails", "failure",
    "weak", "dangerous", "danger", "costly", "concern", "concerns", "worse", "worst",
    "unsafe", "inefficient", "difficult", "threat", "drawback", "drawbacks",
    // Spanish
    "malo", "mala", "malos", "malas", "negativo", "negativa", "perjudicial", "riesgo",
    "riesgos", "problema", "problemas", "desventaja", "desventajas", "fracaso", "débil",
    "peligroso", "peligrosa", "peligro", "costoso", "costosa", "preocupación", "peor",
    "difícil", "amenaza", "inconveniente",
];

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:1[5-9]|20)\d{2}\b").expect("valid year regex"));

static PERCENTAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)?\s?%").expect("valid percentage regex"));

static CURRENCY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[$€£¥]\s?\d[\d,]*(?:\.\d+)?(?:\s?(?:million|billion|thousand|millones|mil|k|m|bn)\b)?|\b\d[\d,]*(?:\.\d+)?\s?(?:dollars|euros|pounds|usd|eur|gbp|dólares|pesos)\b",
    )
    .expect("valid currency regex")
});

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d[\d,]*(?:\.\d+)?\b").expect("valid number regex"));

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n").expect("valid paragraph regex"));

static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:[-*•+]|\d+[.)])[ \t]+").expect("valid list item regex")
});

/// Lowercase, replace every non-alphanumeric character with a space, and
/// split on whitespace. Accented letters count as alphanumeric.
pub fn normalize_tokens(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().map(str::to_string).collect()
}

/// Whether a token is in the multilingual stopword list
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Top-[`KEYWORD_PROFILE_SIZE`] keywords by frequency.
///
/// Tokens of three characters or fewer and stopwords are dropped. Ties are
/// broken by first occurrence so the profile is deterministic.
pub fn keyword_profile(text: &str) -> Vec<String> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, token) in normalize_tokens(text).into_iter().enumerate() {
        if token.chars().count() <= 3 || is_stopword(&token) {
            continue;
        }
        counts
            .entry(token)
            .and_modify(|(count, _)| *count += 1)
            .or_insert((1, position));
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(token, (count, first))| (token, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .take(KEYWORD_PROFILE_SIZE)
        .map(|(token, _, _)| token)
        .collect()
}

/// Deduplicated factual claims: years, percentages, monetary amounts and
/// standalone numbers (numbers already counted as years are skipped).
pub fn extract_facts(text: &str) -> BTreeSet<String> {
    let mut facts = BTreeSet::new();
    let mut years = BTreeSet::new();

    for m in YEAR.find_iter(text) {
        years.insert(m.as_str().to_string());
        facts.insert(normalize_fact(m.as_str()));
    }
    for m in PERCENTAGE.find_iter(text) {
        facts.insert(normalize_fact(m.as_str()));
    }
    for m in CURRENCY.find_iter(text) {
        facts.insert(normalize_fact(m.as_str()));
    }
    for m in NUMBER.find_iter(text) {
        if !years.contains(m.as_str()) {
            facts.insert(normalize_fact(m.as_str()));
        }
    }
    facts
}

fn normalize_fact(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Sentiment polarity in `[-1, 1]`: `(pos - neg) / (pos + neg)`, `0` when
/// the text carries no sentiment words.
pub fn sentiment(text: &str) -> f64 {
    let (positive, negative) = normalize_tokens(text)
        .iter()
        .fold((0usize, 0usize), |(p, n), token| {
            if POSITIVE_WORDS.contains(&token.as_str()) {
                (p + 1, n)
            } else if NEGATIVE_WORDS.contains(&token.as_str()) {
                (p, n + 1)
            } else {
                (p, n)
            }
        });
    let total = positive + negative;
    if total == 0 {
        0.0
    } else {
        (positive as f64 - negative as f64) / total as f64
    }
}

/// Structural shape of a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureMetrics {
    pub length: usize,
    pub paragraphs: usize,
    pub list_items: usize,
}

/// Character length, paragraph count (blank-line breaks + 1) and list line count
pub fn structure_metrics(text: &str) -> StructureMetrics {
    StructureMetrics {
        length: text.chars().count(),
        paragraphs: PARAGRAPH_BREAK.find_iter(text.trim()).count() + 1,
        list_items: LIST_ITEM.find_iter(text).count(),
    }
}

/// 3-word sliding-window phrases drawn from sentences longer than 10 characters
pub fn phrases(text: &str) -> Vec<Vec<String>> {
    let mut result = Vec::new();
    for sentence in crate::core::string::sentences(text) {
        if sentence.chars().count() <= 10 {
            continue;
        }
        let words = normalize_tokens(sentence);
        for window in words.windows(3) {
            let phrase = window.to_vec();
            if !result.contains(&phrase) {
                result.push(phrase);
            }
        }
    }
    result
}

/// Number of distinct words two phrases share
pub fn shared_words(a: &[String], b: &[String]) -> usize {
    let a: BTreeSet<&String> = a.iter().collect();
    let b: BTreeSet<&String> = b.iter().collect();
    a.intersection(&b).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keeps_accents() {
        let tokens = normalize_tokens("¿La energía nuclear? ¡Sí, claro!");
        assert_eq!(tokens, vec!["la", "energía", "nuclear", "sí", "claro"]);
    }

    #[test]
    fn test_keyword_profile_filters_and_ranks() {
        let text = "Solar power is cheap. Solar panels are cheap and solar is clean. The the the.";
        let profile = keyword_profile(text);
        assert_eq!(profile[0], "solar");
        assert_eq!(profile[1], "cheap");
        assert!(!profile.contains(&"the".to_string()));
        assert!(!profile.contains(&"are".to_string()));
    }

    #[test]
    fn test_keyword_profile_capped() {
        let text = (0..40)
            .map(|i| format!("keyword{i:02}"))
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(keyword_profile(&text).len(), KEYWORD_PROFILE_SIZE);
    }

    #[test]
    fn test_extract_facts_kinds() {
        let facts = extract_facts("In 2020 adoption grew 15% and cost $50,000 across 3 sites.");
        assert!(facts.contains("2020"));
        assert!(facts.contains("15%"));
        assert!(facts.contains("$50,000"));
        assert!(facts.contains("3"));
    }

    #[test]
    fn test_year_not_double_counted_as_number() {
        let facts = extract_facts("It happened in 1998.");
        assert_eq!(facts.len(), 1);
        assert!(facts.contains("1998"));
    }

    #[test]
    fn test_no_facts() {
        assert!(extract_facts("No numbers here at all.").is_empty());
    }

    #[test]
    fn test_sentiment() {
        assert_eq!(sentiment("This is a good and excellent idea."), 1.0);
        assert_eq!(sentiment("Es una idea mala y peligrosa."), -1.0);
        assert_eq!(sentiment("Good but risky."), 0.0);
        assert_eq!(sentiment("Neutral statement."), 0.0);
    }

    #[test]
    fn test_structure_metrics() {
        let text = "Intro paragraph.\n\n- one\n- two\n1. three\n\nClosing.";
        let m = structure_metrics(text);
        assert_eq!(m.paragraphs, 3);
        assert_eq!(m.list_items, 3);
        assert_eq!(m.length, text.chars().count());
    }

    #[test]
    fn test_phrases_skip_short_sentences() {
        assert!(phrases("Yes. No way.").is_empty());
        let p = phrases("Renewable energy reduces emissions.");
        assert_eq!(p.len(), 2);
        assert_eq!(p[0], vec!["renewable", "energy", "reduces"]);
    }

    #[test]
    fn test_shared_words() {
        let a = vec!["solar".to_string(), "energy".to_string(), "is".to_string()];
        let b = vec!["energy".to_string(), "is".to_string(), "cheap".to_string()];
        assert_eq!(shared_words(&a, &b), 2);
    }
}
