//! Session storage settings (`[storage]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Session directory; a per-user data directory when unset
    pub dir: Option<PathBuf>,
    /// Seconds between background cleanups; 0 disables the task
    pub cleanup_interval_secs: u64,
    pub max_age_hours: u64,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            cleanup_interval_secs: 3600,
            max_age_hours: 168,
        }
    }
}

impl FileStorageConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(Self::default_dir)
    }

    /// `$XDG_DATA_HOME/consensus-debate/sessions`, or `./.consensus-debate/sessions`
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("consensus-debate"))
            .unwrap_or_else(|| PathBuf::from(".consensus-debate"))
            .join("sessions")
    }

    pub fn cleanup_interval(&self) -> Option<Duration> {
        (self.cleanup_interval_secs > 0).then_some(Duration::from_secs(self.cleanup_interval_secs))
    }

    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_hours.saturating_mul(3600))
    }
}
