//! Search indexing as a set of build lifecycle hooks.
//!
//! A build cycle moves through
//! `Idle -> AssetsRegistered -> Accumulating -> AssetsCopied -> Idle`:
//! before-render registers the runtime scripts, each rendered page is added
//! to the document store, generate-assets copies the runtime into
//! `<output>/js`, and finish builds and writes the index. A hook called out of
//! that order, for a non-HTML renderer, or while search is disabled does
//! nothing. Before-render always starts a fresh cycle.

use std::{
    path::Path,
    sync::{Mutex, MutexGuard, PoisonError},
};

use bookdex_core::{Book, CoreError, Page, Renderer, Resource, SearchConfig};
use bookdex_search::{
    DocumentStore, IndexBuilder, IndexEmitter, IndexWarning, SearchError, extract,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::context::RenderContext;

/// Output subdirectory for search scripts.
pub const JS_DIR: &str = "js";

/// Resource category the runtime scripts are registered under.
pub const JS_CATEGORY: &str = "js";

/// Plugin errors.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Index construction or emission failed.
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// Invalid configuration.
    #[error("config error: {0}")]
    Config(#[from] CoreError),
}

/// Result type for plugin operations.
pub type Result<T> = std::result::Result<T, PluginError>;

/// The four points at which a host build calls into a plugin.
///
/// Methods take `&self` so a host rendering pages in parallel can share one
/// plugin across threads.
pub trait BuildHooks: Send + Sync {
    /// Called once before any page renders.
    fn on_before_render(
        &self,
        book: &Book,
        renderer: &Renderer,
        ctx: &mut dyn RenderContext,
    ) -> Result<()>;

    /// Called after each page renders.
    fn on_page_rendered(
        &self,
        book: &Book,
        renderer: &Renderer,
        page: &Page,
        ctx: &dyn RenderContext,
    ) -> Result<()>;

    /// Called when the host writes static assets.
    fn on_assets_generated(
        &self,
        book: &Book,
        renderer: &Renderer,
        ctx: &dyn RenderContext,
    ) -> Result<()>;

    /// Called once rendering has finished.
    fn on_finish(&self, book: &Book, renderer: &Renderer, ctx: &dyn RenderContext) -> Result<()>;
}

/// Position in the build cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PluginState {
    /// No build in progress.
    #[default]
    Idle,
    /// Runtime scripts registered; no page seen yet.
    AssetsRegistered,
    /// Pages are being collected.
    Accumulating,
    /// Runtime scripts copied; waiting for finish.
    AssetsCopied,
}

/// What the most recent build cycle produced.
#[derive(Debug, Clone, Default)]
pub struct CycleSummary {
    /// Pages seen by the page hook.
    pub pages_seen: usize,

    /// Documents in the written index.
    pub documents: usize,

    /// Runtime files copied.
    pub assets_copied: usize,

    /// Size of the index script in bytes.
    pub index_bytes: usize,

    /// Warnings raised while building the index.
    pub warnings: Vec<IndexWarning>,
}

/// Builds a client-side search index over the pages of an HTML build.
#[derive(Debug)]
pub struct SearchPlugin {
    config: SearchConfig,
    builder: IndexBuilder,
    emitter: IndexEmitter,
    state: Mutex<PluginState>,
    store: Mutex<DocumentStore>,
    summary: Mutex<CycleSummary>,
}

impl SearchPlugin {
    /// Create the plugin, rejecting invalid configuration up front.
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;

        let builder = IndexBuilder::default().with_max_documents(config.max_index_size);
        builder.validate()?;

        Ok(Self {
            config,
            builder,
            emitter: IndexEmitter::new(),
            state: Mutex::new(PluginState::Idle),
            store: Mutex::new(DocumentStore::new()),
            summary: Mutex::new(CycleSummary::default()),
        })
    }

    /// Current position in the build cycle.
    pub fn state(&self) -> PluginState {
        *lock(&self.state)
    }

    /// Documents collected so far in this cycle.
    pub fn document_count(&self) -> usize {
        lock(&self.store).len()
    }

    /// Locators collected so far in this cycle, in locator order.
    pub fn locators(&self) -> Vec<String> {
        lock(&self.store)
            .all()
            .into_iter()
            .map(|doc| doc.locator.clone())
            .collect()
    }

    /// Summary of the current or most recent cycle.
    pub fn summary(&self) -> CycleSummary {
        lock(&self.summary).clone()
    }

    /// Search configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Directory the runtime scripts are copied from, if configured.
    ///
    /// `None` means the runtime compiled into `bookdex-search` is written.
    pub fn assets_dir(&self) -> Option<&Path> {
        self.config.assets_dir.as_deref()
    }

    fn active(&self, renderer: &Renderer) -> bool {
        self.config.enabled && renderer.is_html()
    }

    /// Move from one of `from` to `to`, returning false if not allowed.
    fn transition(&self, from: &[PluginState], to: PluginState, hook: &str) -> bool {
        let mut state = lock(&self.state);
        if !from.contains(&state) {
            debug!(hook, state = ?*state, "ignoring out-of-order hook");
            return false;
        }
        *state = to;
        true
    }
}

impl BuildHooks for SearchPlugin {
    fn on_before_render(
        &self,
        book: &Book,
        renderer: &Renderer,
        ctx: &mut dyn RenderContext,
    ) -> Result<()> {
        if !self.active(renderer) {
            return Ok(());
        }

        {
            let mut state = lock(&self.state);
            if *state != PluginState::Idle {
                debug!(state = ?*state, "restarting unfinished build cycle");
            }
            *state = PluginState::AssetsRegistered;
        }
        lock(&self.store).clear();
        *lock(&self.summary) = CycleSummary::default();

        for name in ["search-engine", "search-glue"] {
            let resource = Resource::new(name, format!("{JS_DIR}/{name}.js"));
            ctx.add_resource(resource, JS_CATEGORY);
        }

        info!(book = %book.title, "search indexing enabled");
        Ok(())
    }

    fn on_page_rendered(
        &self,
        _book: &Book,
        renderer: &Renderer,
        page: &Page,
        _ctx: &dyn RenderContext,
    ) -> Result<()> {
        if !self.active(renderer) {
            return Ok(());
        }

        let allowed = [PluginState::AssetsRegistered, PluginState::Accumulating];
        if !self.transition(&allowed, PluginState::Accumulating, "page_rendered") {
            return Ok(());
        }
        lock(&self.summary).pages_seen += 1;

        if !page.searchable {
            debug!(locator = %page.locator, "page not searchable, skipping");
            return Ok(());
        }

        let body = extract(&page.text);
        lock(&self.store).add(
            page.locator.clone(),
            page.title.clone(),
            page.summary.clone(),
            page.keywords.clone(),
            body,
        );

        debug!(locator = %page.locator, "indexed page");
        Ok(())
    }

    fn on_assets_generated(
        &self,
        _book: &Book,
        renderer: &Renderer,
        ctx: &dyn RenderContext,
    ) -> Result<()> {
        if !self.active(renderer) {
            return Ok(());
        }

        let allowed = [PluginState::AssetsRegistered, PluginState::Accumulating];
        if !allowed.contains(&self.state()) {
            debug!(state = ?self.state(), "ignoring out-of-order assets hook");
            return Ok(());
        }

        let js_dir = ctx.output_path().join(JS_DIR);
        let copied = self.emitter.install_runtime(self.assets_dir(), &js_dir)?;
        lock(&self.summary).assets_copied = copied;

        self.transition(&allowed, PluginState::AssetsCopied, "assets_generated");
        Ok(())
    }

    fn on_finish(&self, _book: &Book, renderer: &Renderer, ctx: &dyn RenderContext) -> Result<()> {
        if !self.active(renderer) {
            return Ok(());
        }

        if !self.transition(&[PluginState::AssetsCopied], PluginState::Idle, "finish") {
            return Ok(());
        }

        let store = std::mem::take(&mut *lock(&self.store));
        let outcome = self.builder.build(&store.all())?;

        for warning in &outcome.warnings {
            warn!("{warning}");
        }

        let js_dir = ctx.output_path().join(JS_DIR);
        let report = self.emitter.write_index(&outcome.index, &js_dir)?;

        let mut summary = lock(&self.summary);
        summary.documents = store.len();
        summary.index_bytes = report.index_bytes;
        summary.warnings = outcome.warnings;

        info!(
            documents = summary.documents,
            bytes = summary.index_bytes,
            "search index emitted"
        );
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
