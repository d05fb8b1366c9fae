/// Chat completion providers
pub mod completions;

/// Embedding providers
pub mod embeddings;

/// Default base url for OpenAI compatible APIs
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
