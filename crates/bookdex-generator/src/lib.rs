//! bookdex Generator Library
//!
//! Hooks the search indexer into a site build.
//!
//! # Modules
//!
//! - [`plugin`] - Lifecycle hooks and the per-build state machine
//! - [`context`] - Render context handed to the hooks
//! - [`collector`] - Page collection from an already rendered site
//! - [`build`] - Build orchestration

pub mod build;
pub mod collector;
pub mod context;
pub mod plugin;

pub use build::{BuildStats, Builder};
pub use collector::SiteCollector;
pub use context::{BuildContext, RenderContext};
pub use plugin::{BuildHooks, CycleSummary, PluginError, PluginState, SearchPlugin};
