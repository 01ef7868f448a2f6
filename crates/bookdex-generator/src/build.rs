//! Build orchestration.
//!
//! Drives the search plugin over an already rendered site, standing in for a
//! host site generator.

use std::{path::PathBuf, time::Instant};

use bookdex_core::{Book, Config, CoreError, Renderer};
use rayon::prelude::*;
use thiserror::Error;
use tracing::info;

use crate::{
    collector::{CollectorError, SiteCollector},
    context::BuildContext,
    plugin::{BuildHooks, PluginError, SearchPlugin},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Collector error.
    #[error("collector error: {0}")]
    Collector(#[from] CollectorError),

    /// Plugin error.
    #[error("plugin error: {0}")]
    Plugin(#[from] PluginError),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] CoreError),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Rendered pages found.
    pub pages: usize,

    /// Pages written to the index.
    pub indexed: usize,

    /// Runtime files copied.
    pub assets: usize,

    /// Size of the index script in bytes.
    pub index_bytes: usize,

    /// Capacity and other index warnings, rendered for display.
    pub warnings: Vec<String>,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Indexes a rendered site in place.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    site_dir: PathBuf,
    title: String,
}

impl Builder {
    /// Create a new builder for the site rendered into `site_dir`.
    #[must_use]
    pub fn new(config: Config, site_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            site_dir: site_dir.into(),
            title: String::new(),
        }
    }

    /// Set the book title used in log output.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Run the four lifecycle hooks over every rendered page.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();

        info!(site = %self.site_dir.display(), "starting search build");

        self.config.validate()?;
        let plugin = SearchPlugin::new(self.config.search.clone())?;
        let book = Book::new(self.title.clone(), &self.site_dir);
        let renderer = Renderer::html();
        let mut ctx = BuildContext::new(&self.site_dir);

        let pages = SiteCollector::new()?.collect(&self.site_dir)?;
        stats.pages = pages.len();

        plugin.on_before_render(&book, &renderer, &mut ctx)?;

        pages
            .par_iter()
            .try_for_each(|page| plugin.on_page_rendered(&book, &renderer, page, &ctx))?;

        plugin.on_assets_generated(&book, &renderer, &ctx)?;
        plugin.on_finish(&book, &renderer, &ctx)?;

        let summary = plugin.summary();
        stats.indexed = summary.documents;
        stats.assets = summary.assets_copied;
        stats.index_bytes = summary.index_bytes;
        stats.warnings = summary.warnings.iter().map(ToString::to_string).collect();
        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            pages = stats.pages,
            indexed = stats.indexed,
            assets = stats.assets,
            duration_ms = stats.duration_ms,
            "search build complete"
        );

        Ok(stats)
    }
}
