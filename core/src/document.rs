use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A department document held by the knowledge hub
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Caller supplied identifier, unique among live documents.
    pub id: String,
    /// Department tag used for filtering at query time.
    pub department: String,
    pub title: String,
    pub content: String,
    /// Assigned when the document is ingested.
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        department: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::new_at(id, department, title, content, Utc::now())
    }

    pub fn new_at(
        id: impl Into<String>,
        department: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            department: department.into(),
            title: title.into(),
            content: content.into(),
            created_at,
        }
    }

    /// Text handed to the embedding model when the document gets indexed
    #[must_use]
    pub fn embedding_text(&self) -> String {
        format!("{}\n\n{}", self.title, self.content)
    }

    /// Render the document the way it appears in a prompt's context block
    #[must_use]
    pub fn render_context(&self) -> String {
        format!(
            "[Department: {}] {}: {}",
            self.department, self.title, self.content
        )
    }
}
