//! Types the host build system hands to the indexer.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A rendered page as seen by the indexer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Stable URL or path of the page.
    pub locator: String,

    /// Page title.
    pub title: String,

    /// Short summary shown next to search results.
    #[serde(default)]
    pub summary: String,

    /// Keywords in declaration order.
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Rendered HTML content.
    pub text: String,

    /// Whether the page opted in to search.
    #[serde(default)]
    pub searchable: bool,
}

impl Page {
    /// Create a searchable page with the given locator, title and HTML.
    pub fn new(
        locator: impl Into<String>,
        title: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            locator: locator.into(),
            title: title.into(),
            text: text.into(),
            searchable: true,
            ..Self::default()
        }
    }

    /// Set the summary.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Set the keywords.
    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Set the search opt-in flag.
    #[must_use]
    pub fn with_searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }
}

/// The book (site) being built.
#[derive(Debug, Clone, Default)]
pub struct Book {
    /// Book title.
    pub title: String,

    /// Source root of the book.
    pub root: PathBuf,
}

impl Book {
    /// Create a new book description.
    pub fn new(title: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            root: root.into(),
        }
    }
}

/// The output target currently rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renderer {
    name: String,
}

impl Renderer {
    /// Name of the HTML renderer.
    pub const HTML: &'static str = "html";

    /// Create a renderer with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The HTML renderer.
    pub fn html() -> Self {
        Self::new(Self::HTML)
    }

    /// Renderer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this renderer produces the searchable HTML output.
    pub fn is_html(&self) -> bool {
        self.name.eq_ignore_ascii_case(Self::HTML)
    }
}

/// A script or stylesheet registered with the host so templates can link it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Logical name, e.g. `search-engine`.
    pub name: String,

    /// Path relative to the output root, e.g. `js/search-engine.js`.
    pub path: String,
}

impl Resource {
    /// Create a resource descriptor.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_is_html() {
        assert!(Renderer::html().is_html());
        assert!(Renderer::new("HTML").is_html());
        assert!(!Renderer::new("pdf").is_html());
    }

    #[test]
    fn test_page_builder() {
        let page = Page::new("intro.html", "Intro", "<p>Welcome</p>")
            .with_summary("First page")
            .with_keywords(["start", "welcome"]);

        assert!(page.searchable);
        assert_eq!(page.summary, "First page");
        assert_eq!(page.keywords, vec!["start", "welcome"]);
        assert!(!page.with_searchable(false).searchable);
    }

    #[test]
    fn test_page_deserialize_defaults() {
        let source = r#"
locator = "a.html"
title = "A"
text = "<p>a</p>"
"#;
        let page: Page = toml::from_str(source).expect("parse page");
        assert!(!page.searchable);
        assert!(page.keywords.is_empty());
        assert!(page.summary.is_empty());
    }
}
