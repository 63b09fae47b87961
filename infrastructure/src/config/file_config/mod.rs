//! Raw TOML configuration data types
//!
//! These structs mirror the config file one section at a time. Each section
//! converts itself into application settings and reports questionable values
//! as [`ConfigIssue`]s instead of failing.

mod debate;
mod logging;
mod output;
mod participants;
mod pricing;
mod retry;
mod storage;

pub use debate::FileDebateConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use participants::{FileParticipantConfig, FileParticipantsConfig, MODEL_PLACEHOLDER};
pub use pricing::{FileModelPricing, FilePricingConfig};
pub use retry::FileRetryConfig;
pub use storage::FileStorageConfig;

use debate_application::DebateParams;
use debate_domain::{ConfigIssue, Participant};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub debate: FileDebateConfig,
    pub participants: FileParticipantsConfig,
    /// Rate overrides keyed by model id
    pub pricing: FilePricingConfig,
    pub retry: FileRetryConfig,
    pub storage: FileStorageConfig,
    pub logging: FileLoggingConfig,
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.debate.to_settings().1);
        issues.extend(self.debate.parse_continuation_rounds().1);
        issues.extend(self.participants.validate());
        issues.extend(pricing::validate_pricing(&self.pricing));
        issues.extend(self.retry.to_policy().1);
        issues
    }

    /// Application parameters with fallbacks applied.
    pub fn to_debate_params(&self) -> DebateParams {
        let mut params = DebateParams::default()
            .with_defaults(self.debate.to_settings().0)
            .with_continuation_rounds(self.debate.parse_continuation_rounds().0)
            .with_retry(self.retry.to_policy().0);
        for participant in Participant::ALL {
            params = params.with_model(participant, self.participants.model_for(participant));
        }
        params
    }
}
