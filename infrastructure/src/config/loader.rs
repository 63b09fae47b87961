//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "consensus-debate";
const PROJECT_FILES: [&str; 2] = ["debate.toml", ".debate.toml"];
const ENV_PREFIX: &str = "DEBATE_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `DEBATE_*` environment variables (`__` separates sections)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./debate.toml` or `./.debate.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/consensus-debate/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");
        println!("  [ENV  ] Environment: {ENV_PREFIX}<SECTION>__<KEY>");

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISS " };
            println!("  [{mark}] Explicit: {}", path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./debate.toml or ./.debate.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debate_domain::Strategy;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.debate.max_rounds, 3);
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_global_config_path_names_the_app() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("consensus-debate"));
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[debate]\nmax_rounds = 6\nstrategy = \"adversarial\"\n\n[storage]\nmax_age_hours = 24\n",
        )
        .unwrap();

        let config = ConfigLoader::figment(Some(path.as_path()))
            .extract::<FileConfig>()
            .unwrap();
        assert_eq!(config.debate.max_rounds, 6);
        assert_eq!(config.debate.parse_strategy().0, Strategy::Adversarial);
        assert_eq!(config.storage.max_age_hours, 24);
        // untouched keys keep defaults
        assert_eq!(config.debate.continuation_rounds, 2);
        assert_eq!(config.storage.cleanup_interval_secs, 3600);
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[debate\nmax_rounds = ").unwrap();
        assert!(ConfigLoader::load(Some(path.as_path())).is_err());
    }
}
