pub mod embedding;
pub mod model;

use embedding::Embedding;
use model::EmbeddingModel;
use std::{sync::Arc, time::Duration};
use thiserror::Error;
use tracing::{instrument, warn};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmbedderError {
    #[error("Provider error -> HTTP Status {0}: {1}")]
    ProviderError(u16, String),
    #[error("RequestError: {0}")]
    RequestError(String),
    #[error("ParseError: {0}")]
    ParseError(String),
    #[error("Embedding provider did not answer within {0:?}")]
    Timeout(Duration),
    #[error("Embedding has {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl EmbedderError {
    /// Whether the provider could not be reached in time or at all
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::RequestError(_))
    }
}

/// Validating front for an [`EmbeddingModel`].
///
/// Every call is bounded by `timeout`, and vectors whose length differs from the
/// configured dimensionality are rejected instead of being stored or ranked.
#[derive(Clone)]
pub struct Embedder {
    model: Arc<dyn EmbeddingModel>,
    dimensions: usize,
    timeout: Duration,
}

impl Embedder {
    pub fn new(model: Arc<dyn EmbeddingModel>, dimensions: usize, timeout: Duration) -> Self {
        Self {
            model,
            dimensions,
            timeout,
        }
    }

    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError> {
        let vector = match tokio::time::timeout(self.timeout, self.model.embed(text)).await {
            Ok(Ok(vector)) => vector,
            Ok(Err(e)) => {
                warn!(error = %e, "Embedding request failed");
                return Err(e);
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "Embedding request timed out");
                return Err(EmbedderError::Timeout(self.timeout));
            }
        };

        if vector.is_empty() {
            warn!("Embedding provider returned an empty vector");
            return Err(EmbedderError::ParseError(
                "Empty embedding in response".to_string(),
            ));
        }
        if vector.len() != self.dimensions {
            warn!(
                expected = self.dimensions,
                actual = vector.len(),
                "Embedding dimensionality does not match configuration"
            );
            return Err(EmbedderError::DimensionMismatch {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }
        Ok(Embedding(vector))
    }
}
