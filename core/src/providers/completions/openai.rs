use crate::completion::{CompletionError, CompletionModel, Message};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info, instrument};

const COMPLETIONS_PATH: &str = "/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// [OpenAI](https://platform.openai.com) chat completions
pub struct OpenAICompletionModel {
    api_key: String,
    api_url: String,
    client: reqwest::Client,
    model: String,
}

impl OpenAICompletionModel {
    /// `base_url` is the API root, eg `https://api.openai.com/v1`
    #[must_use]
    pub fn new(api_key: impl Into<String>, base_url: &str, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: format!("{}{COMPLETIONS_PATH}", base_url.trim_end_matches('/')),
            client: reqwest::Client::new(),
            model: model.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Eq, PartialEq, Debug)]
#[serde(tag = "role", content = "content")]
#[allow(non_camel_case_types)]
enum OpenAIMessage {
    system(String),
    user(String),
}

impl From<Message> for OpenAIMessage {
    fn from(value: Message) -> OpenAIMessage {
        match value {
            Message::Preamble(s) => OpenAIMessage::system(s),
            Message::User(s) => OpenAIMessage::user(s),
        }
    }
}

#[async_trait]
impl CompletionModel for OpenAICompletionModel {
    #[instrument(
        skip(self, system_prompt, user_prompt),
        fields(model = %self.model, prompt_len = user_prompt.len())
    )]
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f64,
    ) -> Result<String, CompletionError> {
        let messages: Vec<OpenAIMessage> = vec![
            Message::Preamble(system_prompt.to_string()).into(),
            Message::User(user_prompt.to_string()).into(),
        ];
        let request_body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": temperature,
        });

        debug!(request_body = ?request_body, "Sending request to OpenAI");

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
                CompletionError::RequestError(e.to_string())
            })?;

        let status = response.status();
        debug!(%status, "Received API response");

        if !status.is_success() {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error (failed to read response body)".to_string());

            error!(
                status = %status,
                error = %error_msg,
                "API returned error response"
            );
            return Err(CompletionError::ProviderError(status.into(), error_msg));
        }

        let response_json: serde_json::Value = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse response JSON");
            CompletionError::ParseError(e.to_string())
        })?;

        let content = response_json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                error!("Missing content in completion response");
                CompletionError::ParseError("Missing content".to_string())
            })?
            .to_string();

        if let Some(total_tokens) = response_json["usage"]["total_tokens"].as_u64() {
            info!(total_tokens, "Token usage recorded");
        }
        Ok(content)
    }
}
