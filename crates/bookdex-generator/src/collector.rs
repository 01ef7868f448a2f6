//! Page collection from a rendered site.
//!
//! Walks an output directory of HTML files and turns each file into a
//! [`Page`], reading the title, summary, keywords and search opt-out from the
//! document head.

use std::{
    fs,
    path::{Path, PathBuf},
};

use bookdex_core::Page;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::plugin::JS_DIR;

/// Page collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// IO error.
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory walk error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Invalid CSS selector.
    #[error("invalid selector `{0}`")]
    Selector(String),
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Selectors used to read page metadata.
#[derive(Debug)]
struct PageSelectors {
    title: Selector,
    h1: Selector,
    description: Selector,
    keywords: Selector,
    robots: Selector,
    search: Selector,
    main: Selector,
    body: Selector,
}

impl PageSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            title: selector("title")?,
            h1: selector("h1")?,
            description: selector(r#"meta[name="description"]"#)?,
            keywords: selector(r#"meta[name="keywords"]"#)?,
            robots: selector(r#"meta[name="robots"]"#)?,
            search: selector(r#"meta[name="search"]"#)?,
            main: selector("main")?,
            body: selector("body")?,
        })
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| CollectorError::Selector(css.to_string()))
}

/// Collects pages from a directory of rendered HTML.
#[derive(Debug)]
pub struct SiteCollector {
    selectors: PageSelectors,
}

impl SiteCollector {
    /// Create a new collector.
    pub fn new() -> Result<Self> {
        Ok(Self {
            selectors: PageSelectors::new()?,
        })
    }

    /// Collect every `.html` file under `site_dir`, in locator order.
    ///
    /// Files under `<site_dir>/js` are skipped.
    pub fn collect(&self, site_dir: &Path) -> Result<Vec<Page>> {
        info!(site = %site_dir.display(), "collecting rendered pages");

        let js_dir = site_dir.join(JS_DIR);
        let mut pages = Vec::new();

        for entry in WalkDir::new(site_dir).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();

            if !entry.file_type().is_file() || path.starts_with(&js_dir) {
                continue;
            }
            if !path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
            {
                continue;
            }

            let html = fs::read_to_string(path).map_err(|source| CollectorError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let locator = locator_for(site_dir, path);
            let page = self.parse_page(&locator, &html);

            debug!(locator = %page.locator, searchable = page.searchable, "collected page");
            pages.push(page);
        }

        pages.sort_by(|a, b| a.locator.cmp(&b.locator));
        info!(count = pages.len(), "collected pages");
        Ok(pages)
    }

    /// Build a page from a rendered HTML document.
    pub fn parse_page(&self, locator: &str, html: &str) -> Page {
        let document = Html::parse_document(html);
        let sel = &self.selectors;

        let title = first_text(&document, &sel.title)
            .or_else(|| first_text(&document, &sel.h1))
            .unwrap_or_default();

        let summary = meta_content(&document, &sel.description).unwrap_or_default();

        let keywords = meta_content(&document, &sel.keywords)
            .map(|content| {
                content
                    .split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let noindex = meta_content(&document, &sel.robots)
            .is_some_and(|content| content.to_ascii_lowercase().contains("noindex"));
        let opted_out = meta_content(&document, &sel.search)
            .is_some_and(|content| content.eq_ignore_ascii_case("false"));

        let text = document
            .select(&sel.main)
            .next()
            .or_else(|| document.select(&sel.body).next())
            .map_or_else(|| document.root_element().inner_html(), |el| el.inner_html());

        Page {
            locator: locator.to_string(),
            title,
            summary,
            keywords,
            text,
            searchable: !noindex && !opted_out,
        }
    }
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|el: ElementRef<'_>| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
}

/// Path of `path` relative to `root`, with `/` separators.
fn locator_for(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
