//! Inverted index construction and the query-time scoring it supports.
//!
//! The index keeps, per term, the documents it occurs in and its frequency in
//! each indexed field, along with per-document field lengths. Ranking is BM25
//! with the field boost multiplied in, computed at query time by both
//! [`SearchIndex::search`] and the bundled JavaScript runtime.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    Result, SearchError,
    store::SearchDocument,
    tokenizer::{tokenize, tokenize_unique},
};

/// Serialized index format version.
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// Default document count above which a capacity warning is raised.
pub const DEFAULT_MAX_DOCUMENTS: usize = 1_000_000;

/// BM25 term frequency saturation.
const K1: f64 = 1.2;

/// BM25 length normalization.
const B: f64 = 0.75;

/// Weighting of a single document field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldWeight {
    /// Document attribute name.
    pub name: String,

    /// Score multiplier for matches in this field.
    pub boost: u32,

    /// Whether the field is tokenized into the index.
    pub indexed: bool,

    /// Whether the field's text is kept in the index for display.
    #[serde(default)]
    pub stored: bool,
}

impl FieldWeight {
    /// An indexed field with the given boost.
    pub fn indexed(name: impl Into<String>, boost: u32) -> Self {
        Self {
            name: name.into(),
            boost,
            indexed: true,
            stored: false,
        }
    }

    /// A field kept for display but not searched.
    pub fn stored(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            boost: 1,
            indexed: false,
            stored: true,
        }
    }

    /// Also keep this field's text for display.
    #[must_use]
    pub fn and_stored(mut self) -> Self {
        self.stored = true;
        self
    }

    /// Title 10 (also stored), keywords 15, body 1, summary stored only.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::indexed("title", 10).and_stored(),
            Self::indexed("keywords", 15),
            Self::indexed("body", 1),
            Self::stored("summary"),
        ]
    }
}

/// Display data and field lengths for one indexed document.
///
/// Stored field values serialize as top-level keys next to `lengths`, so the
/// default table yields `{"summary": .., "title": .., "lengths": {..}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFields {
    /// Text of each stored field, by field name.
    #[serde(flatten)]
    pub values: BTreeMap<String, String>,

    /// Token count per indexed field.
    pub lengths: BTreeMap<String, u32>,
}

impl StoredFields {
    /// Text of a stored field.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Postings of one term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermPostings {
    /// Number of documents containing the term in any field.
    pub df: u32,

    /// Reference -> field -> term frequency.
    pub postings: BTreeMap<String, BTreeMap<String, u32>>,
}

/// An immutable, serializable inverted index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchIndex {
    /// Format version.
    pub version: u32,

    /// Document attribute used as the result key.
    pub ref_field: String,

    /// Field weights, in configuration order.
    pub fields: Vec<FieldWeight>,

    /// Total number of indexed documents.
    pub document_count: u32,

    /// Reference -> stored fields.
    pub documents: BTreeMap<String, StoredFields>,

    /// Term -> postings.
    pub terms: BTreeMap<String, TermPostings>,
}

/// A ranked query result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Reference-field value of the matching document.
    pub reference: String,

    /// Relevance score; higher is better.
    pub score: f64,
}

/// Non-fatal conditions found while building.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexWarning {
    /// More documents than the configured limit.
    #[error("search index holds {count} documents, above the limit of {limit}; relevance may degrade")]
    Capacity { count: usize, limit: usize },
}

/// A built index with the warnings raised while building it.
#[derive(Debug, Clone)]
pub struct IndexOutcome {
    /// The index.
    pub index: SearchIndex,

    /// Warnings to report to the operator.
    pub warnings: Vec<IndexWarning>,
}

impl SearchIndex {
    /// An index with no documents.
    pub fn empty(ref_field: impl Into<String>, fields: Vec<FieldWeight>) -> Self {
        Self {
            version: INDEX_FORMAT_VERSION,
            ref_field: ref_field.into(),
            fields,
            document_count: 0,
            documents: BTreeMap::new(),
            terms: BTreeMap::new(),
        }
    }

    /// Whether the index holds no documents.
    pub fn is_empty(&self) -> bool {
        self.document_count == 0
    }

    /// Weight of the named field.
    pub fn field(&self, name: &str) -> Option<&FieldWeight> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Stored fields of a document.
    pub fn stored(&self, reference: &str) -> Option<&StoredFields> {
        self.documents.get(reference)
    }

    /// Rank documents against a free-text query.
    ///
    /// A document matches if it contains at least one query term. Hits are
    /// ordered by descending score, ties broken by reference.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let query_terms = tokenize_unique(query);
        if query_terms.is_empty() || self.is_empty() {
            return Vec::new();
        }

        let averages = self.average_lengths();
        let total = f64::from(self.document_count);
        let mut scores: BTreeMap<&str, f64> = BTreeMap::new();

        for term in &query_terms {
            let Some(entry) = self.terms.get(term) else {
                continue;
            };

            let df = f64::from(entry.df);
            let idf = (1.0 + (total - df + 0.5) / (df + 0.5)).ln();

            for (reference, fields) in &entry.postings {
                let lengths = self.documents.get(reference).map(|d| &d.lengths);

                for (field, tf) in fields {
                    let Some(weight) = self.field(field).filter(|w| w.indexed) else {
                        continue;
                    };

                    let tf = f64::from(*tf);
                    let len = lengths
                        .and_then(|l| l.get(field))
                        .map_or(0.0, |l| f64::from(*l));
                    let avg = averages.get(field.as_str()).copied().unwrap_or(1.0);
                    let norm = tf * (K1 + 1.0) / (tf + K1 * (1.0 - B + B * len / avg));

                    *scores.entry(reference.as_str()).or_insert(0.0) +=
                        idf * f64::from(weight.boost) * norm;
                }
            }
        }

        let mut hits: Vec<SearchHit> = scores
            .into_iter()
            .map(|(reference, score)| SearchHit {
                reference: reference.to_string(),
                score,
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.reference.cmp(&b.reference))
        });
        hits
    }

    /// Mean token count per indexed field; never zero.
    fn average_lengths(&self) -> BTreeMap<&str, f64> {
        let total = f64::from(self.document_count.max(1));

        self.fields
            .iter()
            .filter(|f| f.indexed)
            .map(|f| {
                let sum: u64 = self
                    .documents
                    .values()
                    .filter_map(|d| d.lengths.get(&f.name))
                    .map(|l| u64::from(*l))
                    .sum();
                let avg = sum as f64 / total;
                (f.name.as_str(), if avg > 0.0 { avg } else { 1.0 })
            })
            .collect()
    }

    /// Serialize the index to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| SearchError::Serialization(e.to_string()))
    }

    /// Deserialize an index from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SearchError::Serialization(e.to_string()))
    }
}

/// Builds a [`SearchIndex`] from a document snapshot.
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    fields: Vec<FieldWeight>,
    ref_field: String,
    max_documents: usize,
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new(FieldWeight::defaults(), "locator")
    }
}

impl IndexBuilder {
    /// Create a builder for the given fields and reference field.
    pub fn new(fields: Vec<FieldWeight>, ref_field: impl Into<String>) -> Self {
        Self {
            fields,
            ref_field: ref_field.into(),
            max_documents: DEFAULT_MAX_DOCUMENTS,
        }
    }

    /// Set the document count above which a capacity warning is raised.
    #[must_use]
    pub fn with_max_documents(mut self, max_documents: usize) -> Self {
        self.max_documents = max_documents;
        self
    }

    /// Check the field configuration.
    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(SearchError::index("at least one field is required"));
        }

        let mut seen = BTreeSet::new();
        for field in &self.fields {
            if !SearchDocument::ATTRIBUTES.contains(&field.name.as_str()) {
                return Err(SearchError::index(format!(
                    "unknown field `{}`",
                    field.name
                )));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SearchError::index(format!(
                    "field `{}` is configured twice",
                    field.name
                )));
            }
            if !field.indexed && !field.stored {
                return Err(SearchError::index(format!(
                    "field `{}` is neither indexed nor stored",
                    field.name
                )));
            }
            if field.boost == 0 {
                return Err(SearchError::index(format!(
                    "field `{}` must have a positive boost",
                    field.name
                )));
            }
        }

        if !self.fields.iter().any(|f| f.indexed) {
            return Err(SearchError::index("at least one field must be indexed"));
        }

        if !SearchDocument::ATTRIBUTES.contains(&self.ref_field.as_str()) {
            return Err(SearchError::index(format!(
                "unknown reference field `{}`",
                self.ref_field
            )));
        }

        Ok(())
    }

    /// Build the index.
    ///
    /// The result does not depend on the order of `documents`. Zero documents
    /// yield an empty, well-formed index.
    pub fn build(&self, documents: &[&SearchDocument]) -> Result<IndexOutcome> {
        self.validate()?;

        let mut warnings = Vec::new();
        if documents.len() > self.max_documents {
            let warning = IndexWarning::Capacity {
                count: documents.len(),
                limit: self.max_documents,
            };
            warn!(
                count = documents.len(),
                limit = self.max_documents,
                "search index exceeds configured size limit"
            );
            warnings.push(warning);
        }

        let mut index = SearchIndex::empty(self.ref_field.clone(), self.fields.clone());
        let indexed: Vec<&FieldWeight> = self.fields.iter().filter(|f| f.indexed).collect();

        for document in documents {
            let reference = document
                .attribute(&self.ref_field)
                .ok_or_else(|| SearchError::index("reference field missing"))?;

            if index.documents.contains_key(&reference) {
                return Err(SearchError::index(format!(
                    "duplicate reference `{reference}`"
                )));
            }

            let mut lengths = BTreeMap::new();
            for field in &indexed {
                let text = document.attribute(&field.name).unwrap_or_default();
                let tokens = tokenize(&text);
                lengths.insert(field.name.clone(), saturating_u32(tokens.len()));

                for token in tokens {
                    *index
                        .terms
                        .entry(token)
                        .or_default()
                        .postings
                        .entry(reference.clone())
                        .or_default()
                        .entry(field.name.clone())
                        .or_insert(0) += 1;
                }
            }

            let values = self
                .fields
                .iter()
                .filter(|f| f.stored)
                .map(|f| (f.name.clone(), document.attribute(&f.name).unwrap_or_default()))
                .collect();

            index
                .documents
                .insert(reference, StoredFields { values, lengths });
        }

        for entry in index.terms.values_mut() {
            entry.df = saturating_u32(entry.postings.len());
        }
        index.document_count = saturating_u32(index.documents.len());

        info!(
            documents = index.document_count,
            terms = index.terms.len(),
            "built search index"
        );

        Ok(IndexOutcome { index, warnings })
    }
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
