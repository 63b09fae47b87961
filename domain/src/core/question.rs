//! Question value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A question to be debated (Value Object)
///
/// Represents the input query that is sent to all three participants
/// in the first round of a debate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Question {
    content: String,
}

impl Question {
    /// Create a new question, rejecting empty or whitespace-only content
    pub fn new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::InvalidQuestion(
                "question cannot be empty".to_string(),
            ));
        }
        Ok(Self { content })
    }

    /// Get the question content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<&str> for Question {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Question::new(s)
    }
}

impl TryFrom<String> for Question {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Question::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_creation() {
        let q = Question::new("Is nuclear power sustainable?").unwrap();
        assert_eq!(q.content(), "Is nuclear power sustainable?");
    }

    #[test]
    fn test_question_try_from_str() {
        let q: Question = "What is Rust?".try_into().unwrap();
        assert_eq!(q.to_string(), "What is Rust?");
    }

    #[test]
    fn test_empty_question_rejected() {
        assert!(Question::new("").is_err());
        assert!(Question::new("   \n").is_err());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let q = Question::new("Why?").unwrap();
        assert_eq!(serde_json::to_string(&q).unwrap(), "\"Why?\"");
    }
}
