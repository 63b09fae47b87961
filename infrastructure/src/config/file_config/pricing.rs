//! Per-model pricing overrides (`[pricing.<model-id>]` sections)
//!
//! ```toml
//! [pricing."claude-sonnet-4.5"]
//! input_per_million = 3.0
//! output_per_million = 15.0
//! ```

use debate_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// USD rates per one million tokens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FileModelPricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

pub type FilePricingConfig = BTreeMap<String, FileModelPricing>;

pub(super) fn validate_pricing(pricing: &FilePricingConfig) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    for (model, rate) in pricing {
        for (name, value) in [
            ("input_per_million", rate.input_per_million),
            ("output_per_million", rate.output_per_million),
        ] {
            if !value.is_finite() || value < 0.0 {
                let field = format!("pricing.{model}.{name}");
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::OutOfRange {
                        field: field.clone(),
                        value: value.to_string(),
                    },
                    format!("{field}: rates must be non-negative numbers"),
                ));
            }
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_deserialize() {
        let toml_str = r#"
[pricing."gpt-5.2"]
input_per_million = 1.25
output_per_million = 10.0
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let rate = config.pricing["gpt-5.2"];
        assert_eq!(rate.input_per_million, 1.25);
        assert_eq!(rate.output_per_million, 10.0);
        assert!(validate_pricing(&config.pricing).is_empty());
    }

    #[test]
    fn test_negative_rate_is_an_error() {
        let mut pricing = FilePricingConfig::new();
        pricing.insert(
            "cheap".to_string(),
            FileModelPricing {
                input_per_million: -1.0,
                output_per_million: 2.0,
            },
        );
        let issues = validate_pricing(&pricing);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
    }
}
