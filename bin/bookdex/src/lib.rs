//! bookdex CLI Library
//!
//! Command implementations for the bookdex binary, exposed as a library so
//! they can be tested and reused.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, check)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use bookdex::cmd::build::{BuildOptions, run};
//!
//! let options = BuildOptions {
//!     site: "book".into(),
//!     ..BuildOptions::default()
//! };
//! run(Path::new("bookdex.toml"), &options).unwrap();
//! ```

pub mod cmd;

pub use bookdex_core::{Config, Page};
pub use bookdex_generator::{BuildStats, Builder, SearchPlugin};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
