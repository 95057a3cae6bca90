use palwiki_db::DbError;
use palwiki_gemini::GeminiError;
use palwiki_scraper::ScraperError;
use thiserror::Error;

/// Failures surfaced by an [`crate::UpdateStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another update already owns this `source_link`.
    #[error("update already stored for source link {source_link}")]
    Duplicate { source_link: String },

    #[error("record not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[source] DbError),

    /// Backend unreachable or refusing work (used by non-database stores).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => Self::NotFound,
            DbError::DuplicateSourceLink { source_link } => Self::Duplicate { source_link },
            other => Self::Database(other),
        }
    }
}

/// Failures from a [`crate::ContentSynthesizer`].
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error(transparent)]
    Gemini(#[from] GeminiError),

    #[error("synthesis timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("synthesis failed: {0}")]
    Failed(String),
}

/// Errors that abort a whole ingestion run.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("fetch error: {0}")]
    Fetch(#[from] ScraperError),

    /// Shutdown was requested while the run was in flight.
    #[error("ingestion cancelled by shutdown")]
    Cancelled,
}
