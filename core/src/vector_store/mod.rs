pub mod in_memory_vec_store;

pub use in_memory_vec_store::InMemoryVectorStore;

use crate::document::Document;
use crate::embeddings::embedding::Embedding;
use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VectorStoreError {
    #[error("Document `{0}` already exists")]
    DuplicateId(String),
    #[error("Document `{0}` has no embedding")]
    MissingEmbedding(String),
    #[error("Document `{0}` not found")]
    NotFound(String),
    #[error("Embedding has {actual} dimensions, store holds {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Storage for documents and their embeddings.
///
/// Implementations must apply `ingest` and `delete` to the document list and the
/// embedding map together, so no reader observes one without the other.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Append a document and record its embedding.
    async fn ingest(&self, document: Document, embedding: Embedding)
        -> Result<(), VectorStoreError>;

    /// All live documents in insertion order.
    async fn list(&self) -> Vec<Document>;

    /// Remove a document and its embedding, returns whether anything was removed.
    async fn delete(&self, id: &str) -> bool;

    async fn get_embedding(&self, id: &str) -> Result<Embedding, VectorStoreError>;

    /// Documents paired with their embeddings, in insertion order.
    async fn snapshot(&self) -> Result<Vec<(Document, Embedding)>, VectorStoreError>;

    async fn contains(&self, id: &str) -> bool;

    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Cosine similarity of two vectors.
///
/// Empty inputs, mismatched lengths, zero norms and overflowing magnitudes all
/// score `0.0`.
#[must_use]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a.len() != b.len() {
        warn!(
            left = a.len(),
            right = b.len(),
            "Comparing embeddings of different dimensionality"
        );
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let similarity = dot / (norm_a * norm_b);
    if !similarity.is_finite() {
        warn!("Similarity overflowed, scoring 0");
        return 0.0;
    }
    similarity
}
