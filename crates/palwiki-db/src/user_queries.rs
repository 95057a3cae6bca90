//! Database operations for the `user_queries` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `user_queries` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserQueryRow {
    pub id: i64,
    pub user_id: Option<String>,
    pub query_text: String,
    pub ai_response: String,
    pub query_time: DateTime<Utc>,
}

pub struct NewUserQuery<'a> {
    pub user_id: Option<&'a str>,
    pub query_text: &'a str,
    pub ai_response: &'a str,
}

/// Record one question/answer exchange and return its generated id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_user_query(pool: &PgPool, query: &NewUserQuery<'_>) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO user_queries (user_id, query_text, ai_response) \
         VALUES ($1, $2, $3) \
         RETURNING id",
    )
    .bind(query.user_id)
    .bind(query.query_text)
    .bind(query.ai_response)
    .fetch_one(pool)
    .await?;

    Ok(id)
}
