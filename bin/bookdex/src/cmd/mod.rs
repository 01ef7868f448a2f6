//! Command implementations.

pub mod build;
pub mod check;

use std::path::Path;

use bookdex_core::Config;
use color_eyre::eyre::{Result, WrapErr};

/// Load the configuration file with `BOOKDEX__*` environment overrides.
///
/// A missing file leaves the defaults in place; the environment still applies.
pub fn load_config(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        tracing::info!(?config_path, "No configuration file, using defaults");
    }

    Config::load_with_env(config_path).wrap_err("Failed to load configuration")
}
