//! Database operations for the `guides` table.

use chrono::{DateTime, Utc};
use palwiki_core::NewGuide;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `guides` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GuideRow {
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

const GUIDE_COLUMNS: &str = "id, title, content, tags, category, source_link, \
                             is_ai_generated, version, created_at, updated_at";

/// Insert a guide and return its generated id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_guide(pool: &PgPool, guide: &NewGuide) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO guides \
             (title, content, tags, category, source_link, is_ai_generated, version) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING id",
    )
    .bind(&guide.title)
    .bind(&guide.content)
    .bind(&guide.tags)
    .bind(&guide.category)
    .bind(&guide.source_link)
    .bind(guide.is_ai_generated)
    .bind(&guide.version)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Fetch a single guide by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no guide has this id, or [`DbError::Sqlx`]
/// if the query fails.
pub async fn get_guide(pool: &PgPool, id: i64) -> Result<GuideRow, DbError> {
    let row = sqlx::query_as::<_, GuideRow>(&format!(
        "SELECT {GUIDE_COLUMNS} FROM guides WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Returns every guide, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_guides(pool: &PgPool) -> Result<Vec<GuideRow>, DbError> {
    let rows = sqlx::query_as::<_, GuideRow>(&format!(
        "SELECT {GUIDE_COLUMNS} FROM guides ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Guides whose category equals `category`, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_guides_by_category(
    pool: &PgPool,
    category: &str,
) -> Result<Vec<GuideRow>, DbError> {
    let rows = sqlx::query_as::<_, GuideRow>(&format!(
        "SELECT {GUIDE_COLUMNS} FROM guides \
         WHERE category = $1 \
         ORDER BY created_at DESC, id DESC"
    ))
    .bind(category)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Guides whose title contains `fragment`, ignoring case, newest first.
///
/// `%` and `_` in `fragment` match literally.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn search_guides(pool: &PgPool, fragment: &str) -> Result<Vec<GuideRow>, DbError> {
    let pattern = format!("%{}%", escape_like(fragment));
    let rows = sqlx::query_as::<_, GuideRow>(&format!(
        "SELECT {GUIDE_COLUMNS} FROM guides \
         WHERE title ILIKE $1 \
         ORDER BY created_at DESC, id DESC"
    ))
    .bind(pattern)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
