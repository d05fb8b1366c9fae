//! HTTP server implementation using Axum.

use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use knowledgehub::service::KnowledgeHub;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::routes;

/// Build the Axum router with all routes.
pub fn build_router(hub: Arc<KnowledgeHub>, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/embed-index", post(routes::embed_index))
        .route("/query", post(routes::query))
        .route("/documents", get(routes::list_documents))
        .route("/documents/{id}", delete(routes::delete_document))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(hub)
}

/// Any origin unless an explicit list is configured.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
        .collect();
    cors.allow_origin(origins)
}

/// Serve until ctrl-c.
pub async fn start(
    hub: Arc<KnowledgeHub>,
    cors_origins: &[String],
    addr: SocketAddr,
) -> anyhow::Result<()> {
    let app = build_router(hub, cors_origins);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Knowledge hub listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;
    Ok(())
}
