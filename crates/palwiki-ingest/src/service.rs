//! Single-flight wrapper around the pipeline, shared by the scheduler and
//! the admin endpoint.

use palwiki_scraper::NewsClient;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::error::IngestError;
use crate::pipeline::{IngestionPipeline, PipelineReport};
use crate::prompt::topic_candidate;
use crate::shutdown::ShutdownSignal;

/// Result of a scheduled tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CycleOutcome {
    Completed(PipelineReport),
    /// Another cycle held the guard; nothing was fetched.
    Skipped,
}

/// Serializes ingestion cycles: at most one fetch-and-run executes at a time.
pub struct IngestService {
    pipeline: IngestionPipeline,
    fetcher: NewsClient,
    news_url: String,
    shutdown: ShutdownSignal,
    cycle_guard: Mutex<()>,
}

impl IngestService {
    #[must_use]
    pub fn new(
        pipeline: IngestionPipeline,
        fetcher: NewsClient,
        news_url: impl Into<String>,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            pipeline,
            fetcher,
            news_url: news_url.into(),
            shutdown,
            cycle_guard: Mutex::new(()),
        }
    }

    /// Fetches the news page and runs every card through the pipeline.
    ///
    /// Returns [`CycleOutcome::Skipped`] without fetching when another cycle
    /// is in progress.
    ///
    /// # Errors
    ///
    /// - [`IngestError::Fetch`] if the news page cannot be fetched.
    /// - [`IngestError::Cancelled`] if shutdown fires during the fetch or run.
    /// - [`IngestError::Store`] if the pipeline aborts on a store failure.
    pub async fn run_scheduled_cycle(&self) -> Result<CycleOutcome, IngestError> {
        let Ok(_guard) = self.cycle_guard.try_lock() else {
            tracing::info!("ingest: previous cycle still running, skipping tick");
            return Ok(CycleOutcome::Skipped);
        };

        let candidates = tokio::select! {
            biased;
            () = self.shutdown.cancelled() => return Err(IngestError::Cancelled),
            fetched = self.fetcher.fetch_updates(&self.news_url) => fetched?,
        };
        tracing::info!(
            url = %self.news_url,
            candidates = candidates.len(),
            "ingest: fetched news page"
        );

        let report = self.pipeline.run(&candidates, &self.shutdown).await?;
        Ok(CycleOutcome::Completed(report))
    }

    /// Generates a guide for an operator-supplied topic.
    ///
    /// Waits for any running cycle to finish first.
    ///
    /// # Errors
    ///
    /// Same as [`IngestionPipeline::run`].
    pub async fn ingest_topic(&self, topic: &str) -> Result<PipelineReport, IngestError> {
        let _guard = self.cycle_guard.lock().await;
        let candidate = topic_candidate(topic);
        tracing::info!(source_link = %candidate.source_link, "ingest: manual topic cycle");
        self.pipeline
            .run(std::slice::from_ref(&candidate), &self.shutdown)
            .await
    }
}
