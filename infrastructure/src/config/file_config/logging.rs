//! Log destinations (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Diagnostic log file written in addition to stderr
    pub file: Option<PathBuf>,
    /// JSONL debate transcript
    pub conversation_log: Option<PathBuf>,
}
