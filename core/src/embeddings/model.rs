use crate::embeddings::EmbedderError;
use async_trait::async_trait;

/// A provider that turns text into a vector
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    async fn embed(&self, data: &str) -> Result<Vec<f64>, EmbedderError>;
}
