//! # Knowledge Hub - Core API Documentation
//!
//! A small retrieval-augmented question answering engine over department documents.
//!
//! Documents are embedded through an external embedding model and kept in process
//! memory. Questions are embedded the same way, scored against every stored document
//! with cosine similarity, and the best matches are handed to a chat completion model
//! as context.
//!
//! ## Components
//!
//! - **Vector Store**: ordered documents plus their embeddings, behind one lock
//! - **Retrieval**: department filtering, cosine scoring, stable ranking and top-k
//! - **Embedders**: validated, time bounded access to an embedding provider
//! - **Completion**: context assembly and answer generation
//! - **Providers**: OpenAI implementations of the model traits
//!
//! ## Example
//!
//! ```rust,no_run
//! use knowledgehub::{api::{IngestRequest, QueryRequest}, config::Config, service::KnowledgeHub};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), knowledgehub::error::Error> {
//!     let config = Config::from_env()?;
//!     let hub = KnowledgeHub::from_config(&config);
//!
//!     hub.ingest(IngestRequest {
//!         id: "d1".to_string(),
//!         department: "HR".to_string(),
//!         title: "Leave Policy".to_string(),
//!         content: "Employees get 20 days leave.".to_string(),
//!     })
//!     .await?;
//!
//!     let response = hub
//!         .query(QueryRequest {
//!             question: "How many leave days?".to_string(),
//!             department: Some("HR".to_string()),
//!             top_k: 1,
//!         })
//!         .await?;
//!     println!("{}", response.answer);
//!     Ok(())
//! }
//! ```
//!
//! Retrieval is a linear scan over every stored document, there is no index and no
//! persistence.

/// Request and response shapes of the service
pub mod api;

/// Context assembly and answer generation
pub mod completion;

/// Runtime configuration
pub mod config;

/// Document representation
pub mod document;

/// Text embeddings support
pub mod embeddings;

/// Error types for all library operations
pub mod error;

/// Builtin completion and embedding model providers
pub mod providers;

/// Scoring, ranking and top-k selection
pub mod retrieval;

/// The knowledge hub operations
pub mod service;

/// Vector storage and retrieval
pub mod vector_store;
