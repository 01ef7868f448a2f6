//! Build command - indexes a rendered site

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use bookdex_generator::Builder;
use color_eyre::eyre::{Result, WrapErr, bail};

use super::load_config;

/// Command-line overrides for a build.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Rendered site directory.
    pub site: PathBuf,

    /// Runtime assets directory override.
    pub assets: Option<PathBuf>,

    /// Document limit override.
    pub max_index_size: Option<usize>,

    /// Turn search indexing off for this build.
    pub disable: bool,

    /// Site title for log output.
    pub title: String,
}

/// Run the build command.
///
/// Indexes every rendered page under the site directory and writes the search
/// scripts to `<site>/js`.
pub fn run(config_path: &Path, options: &BuildOptions) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?options, "Starting build");

    if !options.site.is_dir() {
        bail!("Site directory not found: {}", options.site.display());
    }

    let mut config = load_config(config_path)?;

    if let Some(assets) = &options.assets {
        tracing::info!(assets = %assets.display(), "Overriding runtime assets from CLI");
        config.search.assets_dir = Some(assets.clone());
    }

    if let Some(max) = options.max_index_size {
        tracing::info!(max, "Overriding max_index_size from CLI");
        config.search.max_index_size = max;
    }

    if options.disable {
        tracing::info!("Search indexing disabled from CLI");
        config.search.enabled = false;
    }

    config.validate().wrap_err("Invalid configuration")?;
    tracing::debug!(?config, "Loaded configuration");

    let stats = Builder::new(config, &options.site)
        .with_title(options.title.clone())
        .build()
        .wrap_err("Build failed")?;

    let duration = start.elapsed();

    println!();
    println!("  Search index built!");
    println!();
    println!("  Pages:      {}", stats.pages);
    println!("  Indexed:    {}", stats.indexed);
    println!("  Assets:     {}", stats.assets);
    println!("  Index size: {} bytes", stats.index_bytes);
    println!();

    if !stats.warnings.is_empty() {
        println!("  Warnings:");
        for warn in &stats.warnings {
            println!("  ⚠ {warn}");
        }
        println!();
    }

    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", options.site.join("js").display());
    println!();

    tracing::info!(?stats, ?duration, "Build completed successfully");

    Ok(())
}
