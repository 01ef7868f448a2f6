//! Per-build accumulation of search documents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A page reduced to the fields the index cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDocument {
    /// Stable URL or path; unique within a store.
    pub locator: String,

    /// Page title.
    pub title: String,

    /// Summary, stored for result display only.
    pub summary: String,

    /// Keywords in declaration order.
    pub keywords: Vec<String>,

    /// Normalized plain text of the page.
    pub body: String,
}

impl SearchDocument {
    /// Names of the attributes a field weight or reference field may name.
    pub const ATTRIBUTES: [&'static str; 5] = ["locator", "title", "summary", "keywords", "body"];

    /// Text of the named attribute. Keywords are joined with a space.
    pub fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "locator" => Some(self.locator.clone()),
            "title" => Some(self.title.clone()),
            "summary" => Some(self.summary.clone()),
            "keywords" => Some(self.keywords.join(" ")),
            "body" => Some(self.body.clone()),
            _ => None,
        }
    }
}

/// Documents collected during one build, keyed by locator.
///
/// Writers must be serialized: `add` takes `&mut self`, and concurrent hosts
/// put the store behind a lock.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: BTreeMap<String, SearchDocument>,
}

impl DocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document, replacing any previous one with the same locator.
    pub fn add(
        &mut self,
        locator: impl Into<String>,
        title: impl Into<String>,
        summary: impl Into<String>,
        keywords: Vec<String>,
        body: impl Into<String>,
    ) -> &SearchDocument {
        let document = SearchDocument {
            locator: locator.into(),
            title: title.into(),
            summary: summary.into(),
            keywords,
            body: body.into(),
        };

        let locator = document.locator.clone();
        if self.documents.contains_key(&locator) {
            tracing::debug!(locator = %locator, "replacing search document");
        }

        self.documents.insert(locator.clone(), document);
        &self.documents[&locator]
    }

    /// Snapshot of every stored document, in locator order.
    pub fn all(&self) -> Vec<&SearchDocument> {
        self.documents.values().collect()
    }

    /// Look up a document by locator.
    pub fn get(&self, locator: &str) -> Option<&SearchDocument> {
        self.documents.get(locator)
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Drop every document; used when a build cycle ends.
    pub fn clear(&mut self) {
        self.documents.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_returns_document() {
        let mut store = DocumentStore::new();
        let doc = store.add(
            "intro.html",
            "Intro",
            "The start",
            vec!["start".to_string()],
            "Welcome home",
        );

        assert_eq!(doc.locator, "intro.html");
        assert_eq!(doc.title, "Intro");
        assert_eq!(doc.keywords, vec!["start"]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_overwrites_same_locator() {
        let mut store = DocumentStore::new();
        store.add("a.html", "First", "", vec![], "old body");
        store.add("a.html", "Second", "new", vec!["k".to_string()], "new body");

        let all = store.all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Second");
        assert_eq!(all[0].summary, "new");
        assert_eq!(all[0].body, "new body");
        assert_eq!(all[0].keywords, vec!["k"]);
    }

    #[test]
    fn test_all_is_stable() {
        let mut store = DocumentStore::new();
        store.add("b.html", "B", "", vec![], "");
        store.add("a.html", "A", "", vec![], "");
        store.add("c.html", "C", "", vec![], "");

        let first: Vec<_> = store.all().iter().map(|d| d.locator.clone()).collect();
        let second: Vec<_> = store.all().iter().map(|d| d.locator.clone()).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec!["a.html", "b.html", "c.html"]);
    }

    #[test]
    fn test_clear() {
        let mut store = DocumentStore::new();
        store.add("a.html", "A", "", vec![], "");
        assert!(!store.is_empty());
        store.clear();
        assert!(store.is_empty());
        assert!(store.get("a.html").is_none());
    }

    #[test]
    fn test_attribute() {
        let mut store = DocumentStore::new();
        let doc = store.add(
            "a.html",
            "A",
            "sum",
            vec!["one".to_string(), "two".to_string()],
            "body",
        );

        assert_eq!(doc.attribute("keywords").as_deref(), Some("one two"));
        assert_eq!(doc.attribute("locator").as_deref(), Some("a.html"));
        assert!(doc.attribute("missing").is_none());
    }
}
