//! Indexer configuration management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for bookdex.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Search settings.
    #[serde(default)]
    pub search: SearchConfig,
}

/// Search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Whether search indexing is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Document count above which index quality is at risk.
    ///
    /// Exceeding it is reported as a warning; the build still completes.
    #[serde(default = "default_max_index_size")]
    pub max_index_size: usize,

    /// Directory holding the search runtime scripts to copy into the output.
    ///
    /// When unset, the runtime bundled with `bookdex-search` is used.
    #[serde(default)]
    pub assets_dir: Option<PathBuf>,
}

/// Default document limit for a single index.
pub const DEFAULT_MAX_INDEX_SIZE: usize = 1_000_000;

fn default_true() -> bool {
    true
}

fn default_max_index_size() -> usize {
    DEFAULT_MAX_INDEX_SIZE
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_index_size: default_max_index_size(),
            assets_dir: None,
        }
    }
}

impl SearchConfig {
    /// Validate the search settings.
    pub fn validate(&self) -> Result<()> {
        if self.max_index_size == 0 {
            return Err(CoreError::config(
                "search.max_index_size must be a positive integer",
            ));
        }

        if self
            .assets_dir
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            return Err(CoreError::config("search.assets_dir cannot be empty"));
        }

        if self.max_index_size > 100_000 {
            tracing::debug!(
                max_index_size = self.max_index_size,
                "index quality degrades above roughly 100k documents"
            );
        }

        Ok(())
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration layering `BOOKDEX__SECTION__KEY` environment overrides.
    ///
    /// A missing file is not an error: defaults apply and the environment is
    /// still read.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        Self::load_layered(
            path,
            config::Environment::with_prefix("BOOKDEX")
                .separator("__")
                .try_parsing(true),
        )
    }

    fn load_layered(path: &Path, environment: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(environment)
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.search.validate()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn create_test_config() -> String {
        r#"
[search]
enabled = false
max_index_size = 5000
assets_dir = "theme/search"
"#
        .to_string()
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("bookdex.toml");
        let mut file = std::fs::File::create(&config_path).expect("create file");
        file.write_all(create_test_config().as_bytes())
            .expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert!(!config.search.enabled);
        assert_eq!(config.search.max_index_size, 5000);
        assert_eq!(
            config.search.assets_dir.as_deref(),
            Some(Path::new("theme/search"))
        );
    }

    #[test]
    fn test_config_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("bookdex.toml");
        std::fs::write(&config_path, "").expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert!(config.search.enabled);
        assert_eq!(config.search.max_index_size, 1_000_000);
        assert!(config.search.assets_dir.is_none());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_max_index_size() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("bookdex.toml");
        std::fs::write(&config_path, "[search]\nmax_index_size = 0\n").expect("write");

        let result = Config::load(&config_path);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("max_index_size must be a positive integer")
        );
    }

    #[test]
    fn test_config_rejects_negative_size() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("bookdex.toml");
        std::fs::write(&config_path, "[search]\nmax_index_size = -3\n").expect("write");

        let err = Config::load(&config_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_not_found() {
        let result = Config::load(Path::new("/nonexistent/bookdex.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_load_with_env_reads_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("bookdex.toml");
        std::fs::write(&config_path, "[search]\nmax_index_size = 42\n").expect("write");

        let config = Config::load_with_env(&config_path).expect("load config");
        assert_eq!(config.search.max_index_size, 42);
    }

    fn env_with(vars: &[(&str, &str)]) -> config::Environment {
        config::Environment::with_prefix("BOOKDEX")
            .separator("__")
            .try_parsing(true)
            .source(Some(
                vars.iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
            ))
    }

    #[test]
    fn test_env_overrides_apply_without_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let missing = dir.path().join("bookdex.toml");

        let config = Config::load_layered(
            &missing,
            env_with(&[
                ("BOOKDEX__SEARCH__ENABLED", "false"),
                ("BOOKDEX__SEARCH__MAX_INDEX_SIZE", "250"),
            ]),
        )
        .expect("load config");

        assert!(!config.search.enabled);
        assert_eq!(config.search.max_index_size, 250);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("bookdex.toml");
        std::fs::write(&config_path, "[search]\nenabled = true\nmax_index_size = 42\n")
            .expect("write");

        let config = Config::load_layered(
            &config_path,
            env_with(&[("BOOKDEX__SEARCH__ENABLED", "false")]),
        )
        .expect("load config");

        assert!(!config.search.enabled);
        assert_eq!(config.search.max_index_size, 42);
    }

    #[test]
    fn test_env_overrides_are_validated() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let result = Config::load_layered(
            &dir.path().join("bookdex.toml"),
            env_with(&[("BOOKDEX__SEARCH__MAX_INDEX_SIZE", "0")]),
        );
        assert!(result.is_err());
    }
}
