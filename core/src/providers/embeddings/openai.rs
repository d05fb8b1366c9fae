use crate::embeddings::{model::EmbeddingModel, EmbedderError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, instrument};

const EMBEDDINGS_PATH: &str = "/embeddings";
pub const DEFAULT_MODEL: &str = "text-embedding-3-small";

/// [OpenAI](https://platform.openai.com) embeddings
pub struct OpenAIEmbeddingModel {
    api_url: String,
    api_key: String,
    client: Client,
    model: String,
}

impl OpenAIEmbeddingModel {
    /// `base_url` is the API root, eg `https://api.openai.com/v1`
    #[must_use]
    pub fn new(api_key: impl Into<String>, base_url: &str, model: impl Into<String>) -> Self {
        Self {
            api_url: format!("{}{EMBEDDINGS_PATH}", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            client: Client::new(),
            model: model.into(),
        }
    }
}

#[derive(Deserialize)]
struct OpenAIEmbeddingResponse {
    pub data: Vec<OpenAIEmbeddingData>,
}

#[derive(Deserialize)]
struct OpenAIEmbeddingData {
    pub embedding: Vec<f64>,
}

#[async_trait]
impl EmbeddingModel for OpenAIEmbeddingModel {
    #[instrument(skip(self, data), fields(model = %self.model, data_len = data.len()))]
    async fn embed(&self, data: &str) -> Result<Vec<f64>, EmbedderError> {
        let request_body = json!({
                "input": data,
                "model": self.model,
        });
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Request failed");
                EmbedderError::RequestError(e.to_string())
            })?;

        let status = response.status();
        debug!(%status, "Received API response");

        if status.is_success() {
            let response = response
                .json::<OpenAIEmbeddingResponse>()
                .await
                .map_err(|e| EmbedderError::ParseError(e.to_string()))?;

            response
                .data
                .into_iter()
                .next()
                .map(|d| d.embedding)
                .ok_or_else(|| EmbedderError::ParseError("No embedding in response".to_string()))
        } else {
            let error_message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            error!(status = %status, error = %error_message, "API returned error response");
            Err(EmbedderError::ProviderError(status.into(), error_message))
        }
    }
}
