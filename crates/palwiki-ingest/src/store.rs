//! Persistence seam shared by the pipeline and the HTTP layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use palwiki_core::{CandidateUpdate, NewGuide};
use serde::Serialize;

use crate::error::StoreError;

/// A persisted guide as returned to readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Guide {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub tags: String,
    pub category: String,
    pub source_link: String,
    pub is_ai_generated: bool,
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<palwiki_db::GuideRow> for Guide {
    fn from(row: palwiki_db::GuideRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            tags: row.tags,
            category: row.category,
            source_link: row.source_link,
            is_ai_generated: row.is_ai_generated,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// One question/answer exchange from the generate endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserQuery {
    pub user_id: Option<String>,
    pub query_text: String,
    pub ai_response: String,
}

/// Storage for updates, guides, and user queries.
///
/// Each call is atomic on its own. `exists` followed by `insert_update` is
/// not, so implementations must reject a second update with the same
/// `source_link` with [`StoreError::Duplicate`].
#[async_trait]
pub trait UpdateStore: Send + Sync {
    async fn exists(&self, source_link: &str) -> Result<bool, StoreError>;

    /// Persists `update` and returns its id.
    async fn insert_update(&self, update: &CandidateUpdate) -> Result<i64, StoreError>;

    async fn mark_processed(&self, update_id: i64) -> Result<(), StoreError>;

    async fn insert_guide(&self, guide: &NewGuide) -> Result<i64, StoreError>;

    /// All guides, newest first.
    async fn list_guides(&self) -> Result<Vec<Guide>, StoreError>;

    /// Guides in exactly `category`, newest first.
    async fn list_guides_by_category(&self, category: &str) -> Result<Vec<Guide>, StoreError>;

    /// Guides whose title contains `fragment`, ignoring case, newest first.
    async fn search_guides(&self, fragment: &str) -> Result<Vec<Guide>, StoreError>;

    async fn get_guide(&self, id: i64) -> Result<Guide, StoreError>;

    async fn record_query(&self, query: &NewUserQuery) -> Result<i64, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
