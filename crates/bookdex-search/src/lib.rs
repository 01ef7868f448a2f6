//! bookdex Search Library
//!
//! Turns rendered pages into a client-side search index.
//!
//! # Pipeline
//!
//! - **Extraction** ([`extract`]): rendered HTML to plain page text
//! - **Accumulation** ([`DocumentStore`]): one [`SearchDocument`] per locator
//! - **Construction** ([`IndexBuilder`]): weighted multi-field inverted index
//! - **Emission** ([`IndexEmitter`]): runtime scripts plus `search-index.js`
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use bookdex_search::{DocumentStore, IndexBuilder, IndexEmitter, extract};
//!
//! let mut store = DocumentStore::new();
//! store.add("intro.html", "Intro", "", vec![], extract("<p>Welcome home</p>"));
//!
//! let outcome = IndexBuilder::default().build(&store.all()).unwrap();
//! IndexEmitter::new()
//!     .emit(&outcome.index, None, Path::new("book/js"))
//!     .unwrap();
//! ```

pub mod emitter;
pub mod extract;
pub mod index;
pub mod store;
pub mod tokenizer;

use std::path::PathBuf;

pub use emitter::{BUNDLED_RUNTIME, EmitReport, INDEX_SCRIPT_NAME, IndexEmitter};
pub use extract::extract;
pub use index::{
    FieldWeight, IndexBuilder, IndexOutcome, IndexWarning, SearchHit, SearchIndex, StoredFields,
    TermPostings,
};
pub use store::{DocumentStore, SearchDocument};
use thiserror::Error;

/// Search-related errors.
#[derive(Debug, Error)]
pub enum SearchError {
    /// I/O error on a specific path.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Index construction error.
    #[error("Index error: {0}")]
    Index(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SearchError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an index construction error.
    pub fn index(message: impl Into<String>) -> Self {
        Self::Index(message.into())
    }
}

/// Result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;
