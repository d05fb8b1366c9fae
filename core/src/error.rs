use crate::{
    completion::CompletionError, config::ConfigError, embeddings::EmbedderError,
    vector_store::VectorStoreError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("OpenAI API key not configured")]
    NotConfigured,
    #[error("Document not found")]
    NotFound(String),
    #[error("Embedding error: {0}")]
    Embedder(#[from] EmbedderError),
    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),
    #[error("VectorStore error: {0}")]
    VectorStore(#[from] VectorStoreError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Whether an external provider timed out or could not be reached
    #[must_use]
    pub fn is_provider_unavailable(&self) -> bool {
        match self {
            Self::Embedder(e) => e.is_unavailable(),
            Self::Completion(e) => e.is_unavailable(),
            _ => false,
        }
    }
}
