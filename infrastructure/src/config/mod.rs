//! Configuration loading for consensus-debate
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DEBATE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./debate.toml` or `./.debate.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/consensus-debate/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileDebateConfig, FileLoggingConfig, FileModelPricing, FileOutputConfig,
    FileParticipantConfig, FileParticipantsConfig, FilePricingConfig, FileRetryConfig,
    FileStorageConfig, MODEL_PLACEHOLDER,
};
pub use loader::ConfigLoader;
