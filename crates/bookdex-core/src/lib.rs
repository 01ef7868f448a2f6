//! bookdex Core Library
//!
//! Configuration, error handling and the host-facing page types shared by the
//! bookdex search indexer.

pub mod config;
pub mod error;
pub mod page;

pub use config::{Config, SearchConfig};
pub use error::{CoreError, Result};
pub use page::{Book, Page, Renderer, Resource};
