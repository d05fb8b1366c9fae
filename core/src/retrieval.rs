use std::cmp::Ordering;

use tracing::{debug, instrument};

use crate::document::Document;
use crate::embeddings::embedding::Embedding;
use crate::vector_store::{cosine_similarity, VectorStore, VectorStoreError};

/// Department value that disables filtering
pub const ALL_DEPARTMENTS: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DepartmentFilter {
    #[default]
    All,
    Only(String),
}

impl DepartmentFilter {
    #[must_use]
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Self::All => true,
            Self::Only(department) => document.department == *department,
        }
    }
}

impl From<Option<&str>> for DepartmentFilter {
    fn from(value: Option<&str>) -> Self {
        match value {
            None | Some("") | Some(ALL_DEPARTMENTS) => Self::All,
            Some(department) => Self::Only(department.to_string()),
        }
    }
}

/// A document together with its similarity to a query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub score: f64,
    pub document: Document,
}

/// Score every document in `snapshot` that passes `filter`, keeping snapshot order.
pub fn score(
    query: &Embedding,
    snapshot: &[(Document, Embedding)],
    filter: &DepartmentFilter,
) -> Vec<ScoredDocument> {
    snapshot
        .iter()
        .filter(|(document, _)| filter.matches(document))
        .map(|(document, embedding)| ScoredDocument {
            score: cosine_similarity(query.as_slice(), embedding.as_slice()),
            document: document.clone(),
        })
        .collect()
}

/// Sort by descending score. The sort is stable, equal scores keep insertion order.
#[must_use]
pub fn rank(mut scored: Vec<ScoredDocument>) -> Vec<ScoredDocument> {
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored
}

/// First `k` entries of `ranked`; `k <= 0` gives nothing.
#[must_use]
pub fn top_k(mut ranked: Vec<ScoredDocument>, k: i64) -> Vec<ScoredDocument> {
    let k = usize::try_from(k).unwrap_or(0);
    ranked.truncate(k);
    ranked
}

/// Brute-force cosine retrieval over a [`VectorStore`]
pub struct Retriever;

impl Retriever {
    /// Rank the store's documents against `query` and keep the best `k`.
    ///
    /// Scoring runs on a snapshot, the store lock is released before any
    /// similarity is computed.
    #[instrument(skip(store, query), fields(dimensions = query.dimensions()))]
    pub async fn retrieve(
        store: &dyn VectorStore,
        query: &Embedding,
        filter: &DepartmentFilter,
        k: i64,
    ) -> Result<Vec<ScoredDocument>, VectorStoreError> {
        let snapshot = store.snapshot().await?;
        let results = Self::retrieve_from(&snapshot, query, filter, k);
        debug!(candidates = snapshot.len(), returned = results.len(), "Retrieved documents");
        Ok(results)
    }

    pub fn retrieve_from(
        snapshot: &[(Document, Embedding)],
        query: &Embedding,
        filter: &DepartmentFilter,
        k: i64,
    ) -> Vec<ScoredDocument> {
        top_k(rank(score(query, snapshot, filter)), k)
    }
}
