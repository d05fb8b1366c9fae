use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::{
    api::{
        DeleteResponse, HealthResponse, IngestRequest, IngestResponse, ListResponse,
        QueryRequest, QueryResponse,
    },
    completion::{Answerer, CompletionModel},
    config::Config,
    document::Document,
    embeddings::{model::EmbeddingModel, Embedder},
    error::Error,
    providers::{completions::OpenAI, embeddings::OpenAIEmbedding},
    retrieval::{DepartmentFilter, Retriever},
    vector_store::{InMemoryVectorStore, VectorStore, VectorStoreError},
};

pub const NO_DOCUMENTS_ANSWER: &str =
    "No documents have been uploaded yet. Please upload some documents first.";
pub const NO_RELEVANT_DOCUMENTS_ANSWER: &str = "No relevant documents found for your question.";

/// The external models the hub talks to
#[derive(Clone)]
pub struct Providers {
    pub embedder: Embedder,
    pub answerer: Answerer,
}

impl Providers {
    pub fn new(
        embedding_model: Arc<dyn EmbeddingModel>,
        completion_model: Arc<dyn CompletionModel>,
        config: &Config,
    ) -> Self {
        Self {
            embedder: Embedder::new(
                embedding_model,
                config.embedding_dimensions,
                config.provider_timeout,
            ),
            answerer: Answerer::new(completion_model, config.provider_timeout),
        }
    }

    /// OpenAI backed providers, `None` when no api key is configured
    #[must_use]
    pub fn openai(config: &Config) -> Option<Self> {
        let api_key = config.api_key.as_deref()?;
        Some(Self::new(
            Arc::new(OpenAIEmbedding::new(
                api_key,
                &config.base_url,
                config.embed_model.clone(),
            )),
            Arc::new(OpenAI::new(api_key, &config.base_url, config.chat_model.clone())),
            config,
        ))
    }
}

/// Question answering over an in-process document set.
///
/// Built once at startup and shared by handle. Provider calls never happen
/// while the store is locked.
pub struct KnowledgeHub {
    store: Arc<dyn VectorStore>,
    providers: Option<Providers>,
}

impl KnowledgeHub {
    pub fn new(store: Arc<dyn VectorStore>, providers: Option<Providers>) -> Self {
        Self { store, providers }
    }

    /// In-memory hub wired to OpenAI according to `config`
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let providers = Providers::openai(config);
        if providers.is_none() {
            warn!("OPENAI_API_KEY not set, ingest and query will be refused");
        }
        Self::new(Arc::new(InMemoryVectorStore::new()), providers)
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.providers.is_some()
    }

    fn providers(&self) -> Result<&Providers, Error> {
        self.providers.as_ref().ok_or(Error::NotConfigured)
    }

    #[instrument(skip(self, request), fields(id = %request.id, department = %request.department))]
    pub async fn ingest(&self, request: IngestRequest) -> Result<IngestResponse, Error> {
        let providers = self.providers()?;
        if self.store.contains(&request.id).await {
            return Err(VectorStoreError::DuplicateId(request.id).into());
        }

        let document = Document::new(
            request.id,
            request.department,
            request.title,
            request.content,
        );
        let embedding = providers.embedder.embed(&document.embedding_text()).await?;
        let embedding_size = embedding.dimensions();
        let id = document.id.clone();

        self.store.ingest(document, embedding).await?;
        info!(embedding_size, "Document indexed");
        Ok(IngestResponse {
            indexed: true,
            id,
            embedding_size,
        })
    }

    #[instrument(skip(self, request), fields(department = ?request.department, top_k = request.top_k))]
    pub async fn query(&self, request: QueryRequest) -> Result<QueryResponse, Error> {
        let providers = self.providers()?;

        let snapshot = self.store.snapshot().await?;
        if snapshot.is_empty() {
            return Ok(QueryResponse {
                answer: NO_DOCUMENTS_ANSWER.to_string(),
                sources: None,
            });
        }

        let filter = DepartmentFilter::from(request.department.as_deref());
        if request.top_k <= 0 || !snapshot.iter().any(|(doc, _)| filter.matches(doc)) {
            info!("No document matches the query filter");
            return Ok(QueryResponse {
                answer: NO_RELEVANT_DOCUMENTS_ANSWER.to_string(),
                sources: None,
            });
        }

        let query_embedding = providers.embedder.embed(&request.question).await?;
        let ranked = Retriever::retrieve_from(&snapshot, &query_embedding, &filter, request.top_k);
        let answer = providers.answerer.answer(&request.question, &ranked).await?;

        Ok(QueryResponse {
            answer: answer.text,
            sources: Some(answer.sources),
        })
    }

    pub async fn list(&self) -> ListResponse {
        ListResponse {
            documents: self.store.list().await,
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<DeleteResponse, Error> {
        if self.store.delete(id).await {
            info!("Document deleted");
            Ok(DeleteResponse {
                deleted: true,
                id: id.to_string(),
            })
        } else {
            Err(Error::NotFound(id.to_string()))
        }
    }

    pub async fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "ok".to_string(),
            documents_count: self.store.len().await,
            openai_configured: self.is_configured(),
        }
    }
}
