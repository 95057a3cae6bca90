//! Database operations for the `official_updates` table.

use chrono::{DateTime, Utc};
use palwiki_core::CandidateUpdate;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `official_updates` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OfficialUpdateRow {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub publish_date: DateTime<Utc>,
    /// Unique per row; enforced by `official_updates_source_link_key`.
    pub source_link: String,
    pub processed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns `true` if an update with this `source_link` has already been stored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn official_update_exists(pool: &PgPool, source_link: &str) -> Result<bool, DbError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM official_updates WHERE source_link = $1)",
    )
    .bind(source_link)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Insert a new official update and return its generated id.
///
/// Uses `ON CONFLICT (source_link) DO NOTHING` so a concurrent writer that
/// inserted the same link first surfaces as [`DbError::DuplicateSourceLink`]
/// instead of a raw constraint violation.
///
/// # Errors
///
/// Returns [`DbError::DuplicateSourceLink`] if the link is already stored, or
/// [`DbError::Sqlx`] if the insert fails.
pub async fn insert_official_update(
    pool: &PgPool,
    update: &CandidateUpdate,
) -> Result<i64, DbError> {
    let id: Option<i64> = sqlx::query_scalar(
        "INSERT INTO official_updates (title, body, publish_date, source_link, processed) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (source_link) DO NOTHING \
         RETURNING id",
    )
    .bind(&update.title)
    .bind(&update.body)
    .bind(update.publish_date)
    .bind(&update.source_link)
    .bind(update.processed)
    .fetch_optional(pool)
    .await?;

    id.ok_or_else(|| DbError::DuplicateSourceLink {
        source_link: update.source_link.clone(),
    })
}

/// Flag an update as processed once its guide has been recorded.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has this id, or [`DbError::Sqlx`]
/// if the update fails.
pub async fn mark_update_processed(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE official_updates \
         SET processed = TRUE, updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}
