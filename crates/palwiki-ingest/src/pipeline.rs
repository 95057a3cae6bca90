//! Ingestion pipeline orchestration.

use std::sync::Arc;
use std::time::Duration;

use palwiki_core::{CandidateUpdate, NewGuide};
use serde::Serialize;

use crate::error::{IngestError, StoreError, SynthesisError};
use crate::prompt::build_guide_prompt;
use crate::shutdown::ShutdownSignal;
use crate::store::UpdateStore;
use crate::synth::ContentSynthesizer;

/// Counters for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    /// Candidates handed to the run.
    pub seen: usize,
    /// Candidates already stored (by existence check or insert conflict).
    pub skipped: usize,
    /// New updates persisted by this run.
    pub inserted: usize,
    pub guides_created: usize,
    pub synthesis_failed: usize,
    pub guide_failed: usize,
}

enum Outcome {
    Skipped,
    GuideCreated,
    SynthesisFailed,
    GuideFailed,
}

/// Runs candidates through novelty check, persistence, and synthesis.
pub struct IngestionPipeline {
    store: Arc<dyn UpdateStore>,
    synthesizer: Arc<dyn ContentSynthesizer>,
    synthesis_timeout: Duration,
}

impl IngestionPipeline {
    #[must_use]
    pub fn new(
        store: Arc<dyn UpdateStore>,
        synthesizer: Arc<dyn ContentSynthesizer>,
        synthesis_timeout: Duration,
    ) -> Self {
        Self {
            store,
            synthesizer,
            synthesis_timeout,
        }
    }

    /// Processes `candidates` strictly in order.
    ///
    /// 1. Skip candidates whose `source_link` is already stored.
    /// 2. Persist the update; an insert conflict also counts as a skip.
    /// 3. Synthesize a guide, bounded by the synthesis timeout.
    /// 4. Persist the guide and mark the update processed.
    ///
    /// A synthesis or guide-insert failure only affects its own candidate.
    /// Updates persisted before an abort stay persisted.
    ///
    /// # Errors
    ///
    /// - [`IngestError::Store`] if an existence check or update insert fails
    ///   for any reason other than a duplicate link.
    /// - [`IngestError::Cancelled`] if `shutdown` fires mid-run.
    pub async fn run(
        &self,
        candidates: &[CandidateUpdate],
        shutdown: &ShutdownSignal,
    ) -> Result<PipelineReport, IngestError> {
        let mut report = PipelineReport {
            seen: candidates.len(),
            ..PipelineReport::default()
        };

        for candidate in candidates {
            if shutdown.is_triggered() {
                tracing::info!(
                    processed = report.skipped + report.inserted,
                    "ingest: shutdown requested, stopping run"
                );
                return Err(IngestError::Cancelled);
            }

            let outcome = self.process(candidate, shutdown).await?;
            match outcome {
                Outcome::Skipped => report.skipped += 1,
                Outcome::GuideCreated => {
                    report.inserted += 1;
                    report.guides_created += 1;
                }
                Outcome::SynthesisFailed => {
                    report.inserted += 1;
                    report.synthesis_failed += 1;
                }
                Outcome::GuideFailed => {
                    report.inserted += 1;
                    report.guide_failed += 1;
                }
            }
        }

        tracing::info!(
            seen = report.seen,
            skipped = report.skipped,
            inserted = report.inserted,
            guides_created = report.guides_created,
            synthesis_failed = report.synthesis_failed,
            guide_failed = report.guide_failed,
            "ingest: run complete"
        );
        Ok(report)
    }

    async fn process(
        &self,
        candidate: &CandidateUpdate,
        shutdown: &ShutdownSignal,
    ) -> Result<Outcome, IngestError> {
        let link = candidate.source_link.as_str();

        if self.store.exists(link).await? {
            tracing::debug!(source_link = link, "ingest: update already stored, skipping");
            return Ok(Outcome::Skipped);
        }

        let update_id = match self.store.insert_update(candidate).await {
            Ok(id) => id,
            Err(StoreError::Duplicate { .. }) => {
                tracing::debug!(
                    source_link = link,
                    "ingest: update inserted concurrently, skipping"
                );
                return Ok(Outcome::Skipped);
            }
            Err(e) => return Err(e.into()),
        };
        tracing::info!(update_id, title = %candidate.title, "ingest: stored new update");

        let content = match self.synthesize(candidate, shutdown).await {
            Ok(content) => content,
            Err(SynthesisOutcome::Cancelled) => {
                tracing::info!(update_id, "ingest: synthesis cancelled by shutdown");
                return Err(IngestError::Cancelled);
            }
            Err(SynthesisOutcome::Failed(e)) => {
                tracing::warn!(update_id, error = %e, "ingest: synthesis failed");
                return Ok(Outcome::SynthesisFailed);
            }
        };

        let guide = NewGuide::from_update(candidate, content);
        match self.store.insert_guide(&guide).await {
            Ok(guide_id) => {
                tracing::info!(update_id, guide_id, "ingest: guide created");
                if let Err(e) = self.store.mark_processed(update_id).await {
                    tracing::warn!(update_id, error = %e, "ingest: failed to mark update processed");
                }
                Ok(Outcome::GuideCreated)
            }
            Err(e) => {
                tracing::warn!(update_id, error = %e, "ingest: failed to store guide");
                Ok(Outcome::GuideFailed)
            }
        }
    }

    async fn synthesize(
        &self,
        candidate: &CandidateUpdate,
        shutdown: &ShutdownSignal,
    ) -> Result<String, SynthesisOutcome> {
        let prompt = build_guide_prompt(&candidate.title, &candidate.body);
        let bounded = tokio::time::timeout(
            self.synthesis_timeout,
            self.synthesizer.generate(&prompt),
        );

        tokio::select! {
            biased;
            () = shutdown.cancelled() => Err(SynthesisOutcome::Cancelled),
            result = bounded => match result {
                Ok(Ok(content)) => Ok(content),
                Ok(Err(e)) => Err(SynthesisOutcome::Failed(e)),
                Err(_) => Err(SynthesisOutcome::Failed(SynthesisError::Timeout {
                    secs: self.synthesis_timeout.as_secs(),
                })),
            },
        }
    }
}

enum SynthesisOutcome {
    Cancelled,
    Failed(SynthesisError),
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
