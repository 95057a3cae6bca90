//! In-process [`UpdateStore`] backed by vectors behind a mutex.
//!
//! Enforces the same `source_link` uniqueness rule as the Postgres schema.
//! Used by tests and for running the server without a database.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use palwiki_core::{CandidateUpdate, NewGuide};

use crate::error::StoreError;
use crate::store::{Guide, NewUserQuery, UpdateStore};

/// An update as held by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpdate {
    pub id: i64,
    pub update: CandidateUpdate,
}

/// A user query as held by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredQuery {
    pub id: i64,
    pub query: NewUserQuery,
    pub query_time: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    updates: Vec<StoredUpdate>,
    guides: Vec<Guide>,
    queries: Vec<StoredQuery>,
    next_id: i64,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    unavailable: AtomicBool,
    reject_guides: AtomicBool,
    report_absent: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every operation fails with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// While set, only `insert_guide` fails.
    pub fn set_reject_guides(&self, reject: bool) {
        self.reject_guides.store(reject, Ordering::SeqCst);
    }

    /// While set, `exists` answers `false` even for stored links, so the
    /// uniqueness check in `insert_update` is the one that fires.
    pub fn set_report_absent(&self, absent: bool) {
        self.report_absent.store(absent, Ordering::SeqCst);
    }

    #[must_use]
    pub fn updates(&self) -> Vec<StoredUpdate> {
        self.lock().updates.clone()
    }

    #[must_use]
    pub fn guides(&self) -> Vec<Guide> {
        self.lock().guides.clone()
    }

    #[must_use]
    pub fn queries(&self) -> Vec<StoredQuery> {
        self.lock().queries.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Guides passing `keep`, newest first.
    fn guides_matching(&self, keep: impl Fn(&Guide) -> bool) -> Result<Vec<Guide>, StoreError> {
        self.check_available()?;
        let mut guides: Vec<Guide> = self
            .lock()
            .guides
            .iter()
            .filter(|g| keep(g))
            .cloned()
            .collect();
        guides.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(guides)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UpdateStore for MemoryStore {
    async fn exists(&self, source_link: &str) -> Result<bool, StoreError> {
        self.check_available()?;
        if self.report_absent.load(Ordering::SeqCst) {
            return Ok(false);
        }
        Ok(self
            .lock()
            .updates
            .iter()
            .any(|u| u.update.source_link == source_link))
    }

    async fn insert_update(&self, update: &CandidateUpdate) -> Result<i64, StoreError> {
        self.check_available()?;
        let mut inner = self.lock();
        if inner
            .updates
            .iter()
            .any(|u| u.update.source_link == update.source_link)
        {
            return Err(StoreError::Duplicate {
                source_link: update.source_link.clone(),
            });
        }
        let id = inner.next_id();
        inner.updates.push(StoredUpdate {
            id,
            update: update.clone(),
        });
        Ok(id)
    }

    async fn mark_processed(&self, update_id: i64) -> Result<(), StoreError> {
        self.check_available()?;
        let mut inner = self.lock();
        let stored = inner
            .updates
            .iter_mut()
            .find(|u| u.id == update_id)
            .ok_or(StoreError::NotFound)?;
        stored.update.processed = true;
        Ok(())
    }

    async fn insert_guide(&self, guide: &NewGuide) -> Result<i64, StoreError> {
        self.check_available()?;
        if self.reject_guides.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("guide inserts rejected".to_string()));
        }
        let mut inner = self.lock();
        let id = inner.next_id();
        let now = Utc::now();
        inner.guides.push(Guide {
            id,
            title: guide.title.clone(),
            content: guide.content.clone(),
            tags: guide.tags.clone(),
            category: guide.category.clone(),
            source_link: guide.source_link.clone(),
            is_ai_generated: guide.is_ai_generated,
            version: guide.version.clone(),
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn list_guides(&self) -> Result<Vec<Guide>, StoreError> {
        self.guides_matching(|_| true)
    }

    async fn list_guides_by_category(&self, category: &str) -> Result<Vec<Guide>, StoreError> {
        self.guides_matching(|g| g.category == category)
    }

    async fn search_guides(&self, fragment: &str) -> Result<Vec<Guide>, StoreError> {
        let needle = fragment.to_lowercase();
        self.guides_matching(|g| g.title.to_lowercase().contains(&needle))
    }

    async fn get_guide(&self, id: i64) -> Result<Guide, StoreError> {
        self.check_available()?;
        self.lock()
            .guides
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn record_query(&self, query: &NewUserQuery) -> Result<i64, StoreError> {
        self.check_available()?;
        let mut inner = self.lock();
        let id = inner.next_id();
        inner.queries.push(StoredQuery {
            id,
            query: query.clone(),
            query_time: Utc::now(),
        });
        Ok(id)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}
