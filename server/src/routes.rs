//! Route handlers, thin wrappers around [`KnowledgeHub`] operations.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use knowledgehub::{
    api::{
        DeleteResponse, ErrorResponse, HealthResponse, IngestRequest, IngestResponse,
        ListResponse, QueryRequest, QueryResponse,
    },
    error::Error,
    service::KnowledgeHub,
    vector_store::VectorStoreError,
};
use std::sync::Arc;
use tracing::{error, warn};

/// Failure of a single request, rendered as `{"error": ...}`
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Hub(Error),
}

impl From<Error> for ApiError {
    fn from(value: Error) -> Self {
        Self::Hub(value)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Hub(e) if e.is_provider_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
            Self::Hub(e) => match e {
                Error::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
                Error::NotFound(_) => StatusCode::NOT_FOUND,
                Error::VectorStore(VectorStoreError::DuplicateId(_)) => StatusCode::CONFLICT,
                Error::Embedder(_) | Error::Completion(_) => StatusCode::BAD_GATEWAY,
                Error::VectorStore(_) | Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            Self::BadRequest(msg) => msg.clone(),
            Self::Hub(e) => e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, error = %self.message(), "Request failed");
        } else {
            warn!(%status, error = %self.message(), "Request rejected");
        }
        (status, Json(ErrorResponse::new(self.message()))).into_response()
    }
}

pub type HubState = State<Arc<KnowledgeHub>>;

pub async fn health(State(hub): HubState) -> Json<HealthResponse> {
    Json(hub.health().await)
}

/// Embed and store a document.
pub async fn embed_index(
    State(hub): HubState,
    payload: Result<Json<IngestRequest>, JsonRejection>,
) -> Result<Json<IngestResponse>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(hub.ingest(request).await?))
}

/// Answer a question from the stored documents.
pub async fn query(
    State(hub): HubState,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(hub.query(request).await?))
}

pub async fn list_documents(State(hub): HubState) -> Json<ListResponse> {
    Json(hub.list().await)
}

pub async fn delete_document(
    State(hub): HubState,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    Ok(Json(hub.delete(&id).await?))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use knowledgehub::{
        completion::{CompletionError, CompletionModel},
        config::Config,
        embeddings::{model::EmbeddingModel, EmbedderError},
        service::{Providers, NO_DOCUMENTS_ANSWER},
        vector_store::InMemoryVectorStore,
    };

    pub(crate) struct ConstantEmbedding;

    #[async_trait]
    impl EmbeddingModel for ConstantEmbedding {
        async fn embed(&self, _data: &str) -> Result<Vec<f64>, EmbedderError> {
            Ok(vec![1.0, 0.5, 0.25])
        }
    }

    pub(crate) struct CannedCompletion;

    #[async_trait]
    impl CompletionModel for CannedCompletion {
        async fn complete(&self, _: &str, _: &str, _: f64) -> Result<String, CompletionError> {
            Ok("20 days".to_string())
        }
    }

    pub(crate) fn configured_hub() -> Arc<KnowledgeHub> {
        let config = Config {
            embedding_dimensions: 3,
            ..Config::default()
        };
        let providers = Providers::new(
            Arc::new(ConstantEmbedding),
            Arc::new(CannedCompletion),
            &config,
        );
        Arc::new(KnowledgeHub::new(
            Arc::new(InMemoryVectorStore::new()),
            Some(providers),
        ))
    }

    fn unconfigured_hub() -> Arc<KnowledgeHub> {
        Arc::new(KnowledgeHub::new(Arc::new(InMemoryVectorStore::new()), None))
    }

    fn leave_policy() -> IngestRequest {
        IngestRequest {
            id: "d1".to_string(),
            department: "HR".to_string(),
            title: "Leave Policy".to_string(),
            content: "Employees get 20 days leave.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_health() {
        let result = health(State(configured_hub())).await;
        let json = result.0;
        assert_eq!(json.status, "ok");
        assert!(json.openai_configured);
        assert_eq!(json.documents_count, 0);
    }

    #[tokio::test]
    async fn test_embed_index_and_list() {
        let hub = configured_hub();
        let result = embed_index(State(hub.clone()), Ok(Json(leave_policy()))).await;
        let json = result.unwrap().0;
        assert!(json.indexed);
        assert_eq!(json.id, "d1");
        assert_eq!(json.embedding_size, 3);

        let listed = list_documents(State(hub)).await.0;
        assert_eq!(listed.documents.len(), 1);
        assert_eq!(listed.documents[0].title, "Leave Policy");
    }

    #[tokio::test]
    async fn test_embed_index_unconfigured() {
        let result = embed_index(State(unconfigured_hub()), Ok(Json(leave_policy()))).await;
        let err = result.unwrap_err();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.message(), "OpenAI API key not configured");
    }

    #[tokio::test]
    async fn test_duplicate_id_conflicts() {
        let hub = configured_hub();
        embed_index(State(hub.clone()), Ok(Json(leave_policy())))
            .await
            .unwrap();
        let err = embed_index(State(hub), Ok(Json(leave_policy())))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_query_empty_store() {
        let request = QueryRequest {
            question: "How many leave days?".to_string(),
            department: None,
            top_k: 5,
        };
        let json = query(State(configured_hub()), Ok(Json(request)))
            .await
            .unwrap()
            .0;
        assert_eq!(json.answer, NO_DOCUMENTS_ANSWER);
        assert!(json.sources.is_none());
    }

    #[tokio::test]
    async fn test_delete_unknown_document() {
        let err = delete_document(State(configured_hub()), Path("missing".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Document not found");
    }

    #[test]
    fn test_provider_errors_map_to_gateway_statuses() {
        let unavailable = ApiError::from(Error::Embedder(EmbedderError::Timeout(
            std::time::Duration::from_secs(30),
        )));
        assert_eq!(unavailable.status(), StatusCode::SERVICE_UNAVAILABLE);

        let rejected = ApiError::from(Error::Completion(CompletionError::ProviderError(
            401,
            "bad key".to_string(),
        )));
        assert_eq!(rejected.status(), StatusCode::BAD_GATEWAY);

        let mismatch = ApiError::from(Error::Embedder(EmbedderError::DimensionMismatch {
            expected: 1536,
            actual: 3,
        }));
        assert_eq!(mismatch.status(), StatusCode::BAD_GATEWAY);

        let fault = ApiError::from(Error::VectorStore(VectorStoreError::MissingEmbedding(
            "d1".to_string(),
        )));
        assert_eq!(fault.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
