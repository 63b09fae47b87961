//! String utilities for the domain layer.

/// Truncate a string to at most `max_chars` characters (UTF-8 safe).
///
/// Counts characters rather than bytes so accented text is cut at the same
/// visual length as ASCII text. No ellipsis is appended.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Split text into sentences on `.`, `!`, `?` and line breaks.
///
/// Returned sentences are trimmed and never empty.
pub fn sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_chars("canción número", 7), "canción");
        assert_eq!(truncate_chars("日本語テスト", 3), "日本語");
    }

    #[test]
    fn test_sentences() {
        let s = sentences("First one. Second!\nThird?  ");
        assert_eq!(s, vec!["First one", "Second", "Third"]);
    }

    #[test]
    fn test_sentences_empty() {
        assert!(sentences("  ...  ").is_empty());
    }
}
