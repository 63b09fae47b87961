//! Participant commands from TOML (`[participants.<name>]` sections)
//!
//! Each participant is backed by an external command that reads the prompt
//! on stdin and prints the answer on stdout. `{model}` in `args` is replaced
//! with the resolved model id.
//!
//! ```toml
//! [participants.claude]
//! command = "llm"
//! args = ["-m", "{model}"]
//! model = "claude-sonnet-4.5"
//! ```

use debate_domain::{ConfigIssue, ConfigIssueCode, Participant};
use serde::{Deserialize, Serialize};

/// Placeholder in `args` replaced with the model id
pub const MODEL_PLACEHOLDER: &str = "{model}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileParticipantConfig {
    pub command: String,
    pub args: Vec<String>,
    /// Model id override; the participant's default model when unset
    pub model: Option<String>,
}

impl Default for FileParticipantConfig {
    fn default() -> Self {
        Self {
            command: "llm".to_string(),
            args: vec!["-m".to_string(), MODEL_PLACEHOLDER.to_string()],
            model: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileParticipantsConfig {
    pub claude: FileParticipantConfig,
    pub gpt: FileParticipantConfig,
    pub gemini: FileParticipantConfig,
}

impl FileParticipantsConfig {
    pub fn get(&self, participant: Participant) -> &FileParticipantConfig {
        match participant {
            Participant::Claude => &self.claude,
            Participant::Gpt => &self.gpt,
            Participant::Gemini => &self.gemini,
        }
    }

    /// Resolved model id for a participant
    pub fn model_for(&self, participant: Participant) -> &str {
        self.get(participant)
            .model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(participant.default_model())
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        for participant in Participant::ALL {
            let config = self.get(participant);
            if config.command.trim().is_empty() {
                let field = format!("participants.{participant}.command");
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyValue {
                        field: field.clone(),
                    },
                    format!("{field}: a command is required"),
                ));
            }
            if let Some(model) = &config.model
                && model.trim().is_empty()
            {
                let field = format!("participants.{participant}.model");
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::EmptyValue {
                        field: field.clone(),
                    },
                    format!(
                        "{field}: empty model name, using '{}'",
                        participant.default_model()
                    ),
                ));
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participants_deserialize() {
        let toml_str = r#"
[participants.gpt]
command = "openai-chat"
args = ["--model", "{model}", "--quiet"]
model = "gpt-5.2-mini"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let gpt = config.participants.get(Participant::Gpt);
        assert_eq!(gpt.command, "openai-chat");
        assert_eq!(gpt.args.len(), 3);
        assert_eq!(config.participants.model_for(Participant::Gpt), "gpt-5.2-mini");
        // untouched participants keep their defaults
        assert_eq!(config.participants.claude.command, "llm");
        assert_eq!(
            config.participants.model_for(Participant::Claude),
            Participant::Claude.default_model()
        );
    }

    #[test]
    fn test_blank_command_is_an_error() {
        let mut config = FileParticipantsConfig::default();
        config.gemini.command = "  ".to_string();
        config.claude.model = Some(String::new());

        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| i.is_error()));
        assert_eq!(
            config.model_for(Participant::Claude),
            Participant::Claude.default_model()
        );
    }
}
