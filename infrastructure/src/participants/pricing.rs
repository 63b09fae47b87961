//! Token pricing per model id.

use crate::config::FilePricingConfig;
use std::collections::HashMap;

/// USD per one million tokens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelRate {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl ModelRate {
    pub const fn new(input_per_million: f64, output_per_million: f64) -> Self {
        Self {
            input_per_million,
            output_per_million,
        }
    }
}

const BUILTIN_RATES: [(&str, ModelRate); 6] = [
    ("claude-sonnet-4.5", ModelRate::new(3.0, 15.0)),
    ("claude-opus-4.5", ModelRate::new(5.0, 25.0)),
    ("claude-haiku-4.5", ModelRate::new(1.0, 5.0)),
    ("gpt-5.2", ModelRate::new(1.75, 14.0)),
    ("gpt-5-mini", ModelRate::new(0.25, 2.0)),
    ("gemini-3-pro-preview", ModelRate::new(2.0, 12.0)),
];

/// Unknown models are priced at this rate so budgets are never underestimated.
const FALLBACK_RATE: ModelRate = ModelRate::new(5.0, 25.0);

/// Rate table used to turn token counts into USD cost.
#[derive(Debug, Clone)]
pub struct PricingTable {
    rates: HashMap<String, ModelRate>,
    fallback: ModelRate,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self {
            rates: BUILTIN_RATES
                .iter()
                .map(|(model, rate)| (model.to_string(), *rate))
                .collect(),
            fallback: FALLBACK_RATE,
        }
    }
}

impl PricingTable {
    /// Built-in rates with `[pricing]` overrides applied
    pub fn from_config(overrides: &FilePricingConfig) -> Self {
        let mut table = Self::default();
        for (model, rate) in overrides {
            table.rates.insert(
                model.clone(),
                ModelRate::new(rate.input_per_million, rate.output_per_million),
            );
        }
        table
    }

    pub fn with_fallback(mut self, fallback: ModelRate) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn rate(&self, model: &str) -> ModelRate {
        self.rates.get(model).copied().unwrap_or(self.fallback)
    }

    pub fn cost(&self, model: &str, input_tokens: u64, output_tokens: u64) -> f64 {
        let rate = self.rate(model);
        (input_tokens as f64 * rate.input_per_million
            + output_tokens as f64 * rate.output_per_million)
            / 1_000_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileModelPricing;

    #[test]
    fn test_builtin_rate() {
        let table = PricingTable::default();
        let cost = table.cost("claude-sonnet-4.5", 1_000_000, 1_000_000);
        assert!((cost - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_model_uses_fallback() {
        let table = PricingTable::default().with_fallback(ModelRate::new(1.0, 1.0));
        let cost = table.cost("mystery-model", 500_000, 500_000);
        assert!((cost - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_overrides_replace_builtin() {
        let mut overrides = FilePricingConfig::new();
        overrides.insert(
            "gpt-5.2".to_string(),
            FileModelPricing {
                input_per_million: 0.0,
                output_per_million: 0.0,
            },
        );
        let table = PricingTable::from_config(&overrides);
        assert_eq!(table.cost("gpt-5.2", 10_000, 10_000), 0.0);
    }
}
