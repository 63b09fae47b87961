//! Debate defaults from TOML (`[debate]` section)
//!
//! ```toml
//! [debate]
//! max_rounds = 3
//! max_cost = 1.0            # soft cap in USD
//! strategy = "consensus"    # or "adversarial"
//! interactive = false
//! continuation_rounds = 2
//! ```

use debate_domain::{ConfigIssue, ConfigIssueCode, DebateSettings, Strategy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    pub max_rounds: usize,
    /// Soft cost cap in USD
    pub max_cost: f64,
    pub strategy: String,
    pub interactive: bool,
    /// Rounds added when a deadlocked session with no rounds left is resumed
    pub continuation_rounds: usize,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        let settings = DebateSettings::default();
        Self {
            max_rounds: settings.max_rounds,
            max_cost: settings.max_cost,
            strategy: settings.strategy.as_str().to_string(),
            interactive: settings.interactive,
            continuation_rounds: 2,
        }
    }
}

impl FileDebateConfig {
    /// Parse the strategy string, falling back to `consensus`.
    pub fn parse_strategy(&self) -> (Strategy, Vec<ConfigIssue>) {
        match self.strategy.parse::<Strategy>() {
            Ok(strategy) => (strategy, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "debate.strategy".to_string(),
                        value: self.strategy.clone(),
                        valid_values: vec!["consensus".to_string(), "adversarial".to_string()],
                    },
                    format!(
                        "debate.strategy: unknown value '{}', falling back to 'consensus'",
                        self.strategy
                    ),
                );
                (Strategy::Consensus, vec![issue])
            }
        }
    }

    /// Build session defaults, replacing unusable numbers with built-in values.
    pub fn to_settings(&self) -> (DebateSettings, Vec<ConfigIssue>) {
        let defaults = DebateSettings::default();
        let (strategy, mut issues) = self.parse_strategy();

        let max_rounds = if self.max_rounds == 0 {
            issues.push(out_of_range(
                "debate.max_rounds",
                self.max_rounds.to_string(),
                defaults.max_rounds.to_string(),
            ));
            defaults.max_rounds
        } else {
            self.max_rounds
        };

        let max_cost = if !self.max_cost.is_finite() || self.max_cost <= 0.0 {
            issues.push(out_of_range(
                "debate.max_cost",
                self.max_cost.to_string(),
                defaults.max_cost.to_string(),
            ));
            defaults.max_cost
        } else {
            self.max_cost
        };

        let settings = DebateSettings {
            max_rounds,
            max_cost,
            strategy,
            interactive: self.interactive,
        };
        (settings, issues)
    }

    pub fn parse_continuation_rounds(&self) -> (usize, Vec<ConfigIssue>) {
        if self.continuation_rounds == 0 {
            let issue = out_of_range("debate.continuation_rounds", "0".to_string(), "2".to_string());
            return (2, vec![issue]);
        }
        (self.continuation_rounds, vec![])
    }
}

fn out_of_range(field: &str, value: String, fallback: String) -> ConfigIssue {
    let message = format!("{field}: {value} is out of range, falling back to {fallback}");
    ConfigIssue::warning(
        ConfigIssueCode::OutOfRange {
            field: field.to_string(),
            value,
        },
        message,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debate_config_deserialize() {
        let toml_str = r#"
[debate]
max_rounds = 5
max_cost = 2.5
strategy = "adversarial"
interactive = true
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let (settings, issues) = config.debate.to_settings();
        assert!(issues.is_empty());
        assert_eq!(settings.max_rounds, 5);
        assert_eq!(settings.max_cost, 2.5);
        assert_eq!(settings.strategy, Strategy::Adversarial);
        assert!(settings.interactive);
        assert_eq!(config.debate.continuation_rounds, 2);
    }

    #[test]
    fn test_unknown_strategy_falls_back() {
        let config = FileDebateConfig {
            strategy: "chaotic".to_string(),
            ..Default::default()
        };
        let (strategy, issues) = config.parse_strategy();
        assert_eq!(strategy, Strategy::Consensus);
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            &issues[0].code,
            ConfigIssueCode::InvalidEnumValue { field, .. } if field == "debate.strategy"
        ));
    }

    #[test]
    fn test_out_of_range_numbers_fall_back() {
        let config = FileDebateConfig {
            max_rounds: 0,
            max_cost: -1.0,
            continuation_rounds: 0,
            ..Default::default()
        };
        let (settings, issues) = config.to_settings();
        assert_eq!(settings.max_rounds, 3);
        assert_eq!(settings.max_cost, 1.0);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| !i.is_error()));

        let (rounds, issues) = config.parse_continuation_rounds();
        assert_eq!(rounds, 2);
        assert_eq!(issues.len(), 1);
    }
}
