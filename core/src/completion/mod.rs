use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::retrieval::ScoredDocument;

/// Instruction that keeps the model to the supplied context
pub const SYSTEM_PROMPT: &str = "You are a helpful company policy assistant. Answer strictly from the provided context. If the context doesn't contain relevant information, say so.";

pub const ANSWER_TEMPERATURE: f64 = 0.2;

/// Message that'll be sent in Completions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// System prompt
    Preamble(String),
    /// Message sent by the user
    User(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompletionError {
    #[error("Provider error -> HTTP Status {0}: {1}")]
    ProviderError(u16, String),
    #[error("RequestError: {0}")]
    RequestError(String),
    #[error("ParseError: {0}")]
    ParseError(String),
    #[error("Completion provider did not answer within {0:?}")]
    Timeout(Duration),
}

impl CompletionError {
    /// Whether the provider could not be reached in time or at all
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::RequestError(_))
    }
}

#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Send a system and a user message to the LLM and get the reply text
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f64,
    ) -> Result<String, CompletionError>;
}

/// Render each ranked document as a context entry, keeping rank order.
#[must_use]
pub fn build_contexts(ranked: &[ScoredDocument]) -> Vec<String> {
    ranked
        .iter()
        .map(|scored| scored.document.render_context())
        .collect()
}

#[must_use]
pub fn context_block(contexts: &[String]) -> String {
    contexts.join("\n\n")
}

#[must_use]
pub fn user_prompt(question: &str, context_block: &str) -> String {
    format!("Question: {question}\n\nContext:\n{context_block}")
}

/// The provider's reply plus the context entries it was given
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<String>,
}

/// Turns ranked documents into a grounded answer.
///
/// One attempt per question, bounded by `timeout`. Provider output is returned as is.
#[derive(Clone)]
pub struct Answerer {
    completion_model: Arc<dyn CompletionModel>,
    timeout: Duration,
}

impl Answerer {
    pub fn new(completion_model: Arc<dyn CompletionModel>, timeout: Duration) -> Self {
        Self {
            completion_model,
            timeout,
        }
    }

    #[instrument(skip(self, question, ranked), fields(context_count = ranked.len()))]
    pub async fn answer(
        &self,
        question: &str,
        ranked: &[ScoredDocument],
    ) -> Result<Answer, CompletionError> {
        let sources = build_contexts(ranked);
        let prompt = user_prompt(question, &context_block(&sources));

        let reply = tokio::time::timeout(
            self.timeout,
            self.completion_model
                .complete(SYSTEM_PROMPT, &prompt, ANSWER_TEMPERATURE),
        )
        .await
        .map_err(|_| {
            warn!(timeout = ?self.timeout, "Completion request timed out");
            CompletionError::Timeout(self.timeout)
        })?
        .inspect_err(|e| warn!(error = %e, "Completion request failed"))?;

        info!(answer_len = reply.len(), "Answer generated");
        Ok(Answer {
            text: reply,
            sources,
        })
    }
}
