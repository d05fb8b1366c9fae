use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::{VectorStore, VectorStoreError};
use crate::document::Document;
use crate::embeddings::embedding::Embedding;

#[derive(Default)]
struct Inner {
    documents: Vec<Document>,
    embeddings: HashMap<String, Embedding>,
}

/// Process-local store, lost on restart.
///
/// Both collections sit behind a single lock so every mutation is atomic.
#[derive(Default)]
pub struct InMemoryVectorStore {
    inner: RwLock<Inner>,
}

impl InMemoryVectorStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn ingest(
        &self,
        document: Document,
        embedding: Embedding,
    ) -> Result<(), VectorStoreError> {
        let mut inner = self.inner.write().await;
        if inner.embeddings.contains_key(&document.id) {
            return Err(VectorStoreError::DuplicateId(document.id));
        }
        if let Some(existing) = inner.embeddings.values().next() {
            if existing.dimensions() != embedding.dimensions() {
                return Err(VectorStoreError::DimensionMismatch {
                    expected: existing.dimensions(),
                    actual: embedding.dimensions(),
                });
            }
        }
        debug!(id = %document.id, department = %document.department, "Storing document");
        inner.embeddings.insert(document.id.clone(), embedding);
        inner.documents.push(document);
        Ok(())
    }

    async fn list(&self) -> Vec<Document> {
        self.inner.read().await.documents.clone()
    }

    async fn delete(&self, id: &str) -> bool {
        let mut inner = self.inner.write().await;
        let Some(position) = inner.documents.iter().position(|d| d.id == id) else {
            return false;
        };
        inner.documents.remove(position);
        inner.embeddings.remove(id);
        debug!(id, "Removed document");
        true
    }

    async fn get_embedding(&self, id: &str) -> Result<Embedding, VectorStoreError> {
        let inner = self.inner.read().await;
        if let Some(embedding) = inner.embeddings.get(id) {
            return Ok(embedding.clone());
        }
        if inner.documents.iter().any(|d| d.id == id) {
            Err(VectorStoreError::MissingEmbedding(id.to_string()))
        } else {
            Err(VectorStoreError::NotFound(id.to_string()))
        }
    }

    async fn snapshot(&self) -> Result<Vec<(Document, Embedding)>, VectorStoreError> {
        let inner = self.inner.read().await;
        inner
            .documents
            .iter()
            .map(|doc| {
                inner
                    .embeddings
                    .get(&doc.id)
                    .map(|embedding| (doc.clone(), embedding.clone()))
                    .ok_or_else(|| VectorStoreError::MissingEmbedding(doc.id.clone()))
            })
            .collect()
    }

    async fn contains(&self, id: &str) -> bool {
        self.inner.read().await.embeddings.contains_key(id)
    }

    async fn len(&self) -> usize {
        self.inner.read().await.documents.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn doc(id: &str, department: &str) -> Document {
        Document::new(id, department, format!("title {id}"), format!("content {id}"))
    }

    #[tokio::test]
    async fn test_get_embedding() {
        let store = InMemoryVectorStore::new();
        let embedding = Embedding(vec![1.0, 2.0, 3.0]);
        store.ingest(doc("id", "HR"), embedding.clone()).await.unwrap();

        // test getting existing embedding
        let result = store.get_embedding("id").await;
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), embedding);

        // test getting non-existing embedding
        let result = store.get_embedding("non_existant_id").await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err(),
            VectorStoreError::NotFound("non_existant_id".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_embedding_is_a_fault() {
        let store = InMemoryVectorStore::new();
        store.inner.write().await.documents.push(doc("orphan", "IT"));

        assert_eq!(
            store.get_embedding("orphan").await,
            Err(VectorStoreError::MissingEmbedding("orphan".to_string()))
        );
        assert_eq!(
            store.snapshot().await,
            Err(VectorStoreError::MissingEmbedding("orphan".to_string()))
        );
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let store = InMemoryVectorStore::new();
        for id in ["c", "a", "b"] {
            store.ingest(doc(id, "HR"), Embedding(vec![1.0])).await.unwrap();
        }
        let ids: Vec<_> = store.list().await.into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let store = InMemoryVectorStore::new();
        store.ingest(doc("d1", "HR"), Embedding(vec![1.0, 0.0])).await.unwrap();

        let result = store.ingest(doc("d1", "IT"), Embedding(vec![0.0, 1.0])).await;
        assert_eq!(result, Err(VectorStoreError::DuplicateId("d1".to_string())));

        // original entry untouched
        let listed = store.list().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].department, "HR");
        assert_eq!(
            store.get_embedding("d1").await.unwrap(),
            Embedding(vec![1.0, 0.0])
        );
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_rejected() {
        let store = InMemoryVectorStore::new();
        store.ingest(doc("d1", "HR"), Embedding(vec![1.0, 0.0])).await.unwrap();
        let result = store.ingest(doc("d2", "HR"), Embedding(vec![1.0])).await;
        assert_eq!(
            result,
            Err(VectorStoreError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert!(!store.contains("d2").await);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = InMemoryVectorStore::new();
        store.ingest(doc("d1", "HR"), Embedding(vec![1.0])).await.unwrap();
        store.ingest(doc("d2", "HR"), Embedding(vec![2.0])).await.unwrap();

        assert!(store.delete("d1").await);
        assert!(!store.delete("d1").await);

        assert!(!store.contains("d1").await);
        assert!(store.get_embedding("d1").await.is_err());
        let ids: Vec<_> = store.list().await.into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["d2"]);
    }

    #[tokio::test]
    async fn test_id_can_be_reused_after_delete() {
        let store = InMemoryVectorStore::new();
        store.ingest(doc("d1", "HR"), Embedding(vec![1.0])).await.unwrap();
        assert!(store.delete("d1").await);
        let result = store.ingest(doc("d1", "IT"), Embedding(vec![3.0])).await;
        assert!(result.is_ok());
        assert_eq!(store.get_embedding("d1").await.unwrap(), Embedding(vec![3.0]));
    }

    #[tokio::test]
    async fn test_snapshot_pairs_documents_with_embeddings() {
        let store = InMemoryVectorStore::new();
        store.ingest(doc("d1", "HR"), Embedding(vec![1.0, 0.0])).await.unwrap();
        store.ingest(doc("d2", "IT"), Embedding(vec![0.0, 1.0])).await.unwrap();

        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].0.id, "d1");
        assert_eq!(snapshot[0].1, Embedding(vec![1.0, 0.0]));
        assert_eq!(snapshot[1].0.id, "d2");
        assert_eq!(snapshot[1].1, Embedding(vec![0.0, 1.0]));
    }

    #[tokio::test]
    async fn test_concurrent_deletes_report_one_success() {
        let store = Arc::new(InMemoryVectorStore::new());
        store.ingest(doc("d1", "HR"), Embedding(vec![1.0])).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.delete("d1").await })
            })
            .collect();
        let mut removed = 0;
        for handle in handles {
            if handle.await.unwrap() {
                removed += 1;
            }
        }
        assert_eq!(removed, 1);
        assert!(store.is_empty().await);
    }
}
