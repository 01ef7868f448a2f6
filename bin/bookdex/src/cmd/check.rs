//! Check command - validate configuration and runtime assets

use std::path::Path;

use bookdex_core::{Config, config::DEFAULT_MAX_INDEX_SIZE};
use bookdex_search::BUNDLED_RUNTIME;
use color_eyre::eyre::{Result, bail};

use super::load_config;

/// Scripts the page templates link to.
const RUNTIME_SCRIPTS: [&str; 2] = ["search-engine.js", "search-glue.js"];

/// Document count above which ranking quality is known to suffer.
const QUALITY_THRESHOLD: usize = 100_000;

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    if !config_path.exists() {
        println!(
            "  ℹ {} not found, defaults and BOOKDEX__* overrides apply",
            config_path.display()
        );
    }

    let config = match load_config(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            Some(c)
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e:#}"));
            println!("  ✗ Configuration invalid: {e:#}");
            None
        }
    };

    if let Some(ref cfg) = config {
        println!("\nChecking configuration values...");
        check_config_values(cfg, &mut result);

        println!("\nChecking runtime assets...");
        check_assets(cfg, &mut result);
    }

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Check configuration values for likely mistakes.
fn check_config_values(config: &Config, result: &mut ValidationResult) {
    if !config.search.enabled {
        result.add_warning("search.enabled is false, no index will be built");
    }

    let max = config.search.max_index_size;
    if max > QUALITY_THRESHOLD {
        let note = format!(
            "search.max_index_size is {max}; ranking degrades above roughly {QUALITY_THRESHOLD} documents"
        );
        if max == DEFAULT_MAX_INDEX_SIZE {
            println!("  ℹ {note}");
        } else {
            result.add_warning(note);
        }
    }
}

/// Check that the runtime scripts exist.
fn check_assets(config: &Config, result: &mut ValidationResult) {
    let Some(dir) = config.search.assets_dir.as_deref() else {
        for (script, _) in BUNDLED_RUNTIME {
            println!("  ✓ {script} (bundled)");
        }
        return;
    };

    if !dir.is_dir() {
        result.add_error(format!("Assets directory not found: {}", dir.display()));
        return;
    }

    for script in RUNTIME_SCRIPTS {
        if dir.join(script).is_file() {
            println!("  ✓ {script}");
        } else {
            result.add_error(format!("Missing runtime script: {}", dir.join(script).display()));
        }
    }
}
