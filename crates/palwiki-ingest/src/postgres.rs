//! [`UpdateStore`] backed by the `palwiki_db` Postgres queries.

use async_trait::async_trait;
use palwiki_core::{CandidateUpdate, NewGuide};
use sqlx::PgPool;

use crate::error::StoreError;
use crate::store::{Guide, NewUserQuery, UpdateStore};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UpdateStore for PgStore {
    async fn exists(&self, source_link: &str) -> Result<bool, StoreError> {
        Ok(palwiki_db::official_update_exists(&self.pool, source_link).await?)
    }

    async fn insert_update(&self, update: &CandidateUpdate) -> Result<i64, StoreError> {
        Ok(palwiki_db::insert_official_update(&self.pool, update).await?)
    }

    async fn mark_processed(&self, update_id: i64) -> Result<(), StoreError> {
        Ok(palwiki_db::mark_update_processed(&self.pool, update_id).await?)
    }

    async fn insert_guide(&self, guide: &NewGuide) -> Result<i64, StoreError> {
        Ok(palwiki_db::insert_guide(&self.pool, guide).await?)
    }

    async fn list_guides(&self) -> Result<Vec<Guide>, StoreError> {
        let rows = palwiki_db::list_guides(&self.pool).await?;
        Ok(rows.into_iter().map(Guide::from).collect())
    }

    async fn list_guides_by_category(&self, category: &str) -> Result<Vec<Guide>, StoreError> {
        let rows = palwiki_db::list_guides_by_category(&self.pool, category).await?;
        Ok(rows.into_iter().map(Guide::from).collect())
    }

    async fn search_guides(&self, fragment: &str) -> Result<Vec<Guide>, StoreError> {
        let rows = palwiki_db::search_guides(&self.pool, fragment).await?;
        Ok(rows.into_iter().map(Guide::from).collect())
    }

    async fn get_guide(&self, id: i64) -> Result<Guide, StoreError> {
        Ok(palwiki_db::get_guide(&self.pool, id).await?.into())
    }

    async fn record_query(&self, query: &NewUserQuery) -> Result<i64, StoreError> {
        let row = palwiki_db::NewUserQuery {
            user_id: query.user_id.as_deref(),
            query_text: &query.query_text,
            ai_response: &query.ai_response,
        };
        Ok(palwiki_db::insert_user_query(&self.pool, &row).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(palwiki_db::health_check(&self.pool).await?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[sqlx::test(migrations = "../../migrations")]
    async fn duplicate_insert_surfaces_as_store_duplicate(pool: PgPool) {
        let store = PgStore::new(pool);
        let update = CandidateUpdate::new("t", "b", Utc::now(), "/news/1");

        store.insert_update(&update).await.unwrap();
        let err = store.insert_update(&update).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }), "got {err:?}");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn unknown_guide_is_not_found(pool: PgPool) {
        let store = PgStore::new(pool);
        assert!(matches!(
            store.get_guide(424_242).await,
            Err(StoreError::NotFound)
        ));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn guide_round_trips_through_store(pool: PgPool) {
        let store = PgStore::new(pool);
        let update = CandidateUpdate::new("Patch", "body", Utc::now(), "/news/2");
        let update_id = store.insert_update(&update).await.unwrap();
        let guide_id = store
            .insert_guide(&NewGuide::from_update(&update, "guide text"))
            .await
            .unwrap();
        store.mark_processed(update_id).await.unwrap();

        let guide = store.get_guide(guide_id).await.unwrap();
        assert_eq!(guide.title, "【AI生成】Patch");
        assert_eq!(guide.source_link, "/news/2");
        assert_eq!(store.list_guides().await.unwrap().len(), 1);
        assert_eq!(store.search_guides("patch").await.unwrap().len(), 1);
        assert_eq!(
            store
                .list_guides_by_category(palwiki_core::AI_GUIDE_CATEGORY)
                .await
                .unwrap()
                .len(),
            1
        );
        store.health_check().await.unwrap();
    }
}
