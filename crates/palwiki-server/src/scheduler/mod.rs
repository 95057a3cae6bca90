//! Background job scheduler.
//!
//! Kicks off one news ingestion cycle at startup, then registers a job that
//! runs one every `ingest_interval_secs`. Both go through the shared
//! [`IngestService`], so a tick that lands on a running cycle is skipped.

use std::sync::Arc;
use std::time::Duration;

use palwiki_ingest::{CycleOutcome, IngestError, IngestService};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process. Call `shutdown` on it to stop new ticks.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    ingest: Arc<IngestService>,
    interval: Duration,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_interval_job(&scheduler, Arc::clone(&ingest), interval).await?;

    scheduler.start().await?;
    tokio::spawn(async move {
        tracing::info!("scheduler: starting initial ingestion cycle");
        run_cycle(&ingest).await;
    });
    tracing::info!(
        interval_secs = interval.as_secs(),
        "scheduler: news ingestion scheduled"
    );
    Ok(scheduler)
}

async fn register_interval_job(
    scheduler: &JobScheduler,
    ingest: Arc<IngestService>,
    interval: Duration,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_repeated_async(interval, move |_uuid, _lock| {
        let ingest = Arc::clone(&ingest);
        Box::pin(async move {
            tracing::info!("scheduler: starting scheduled ingestion cycle");
            run_cycle(&ingest).await;
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Runs one cycle and logs the outcome. Errors never escape a tick.
async fn run_cycle(ingest: &IngestService) {
    match ingest.run_scheduled_cycle().await {
        Ok(CycleOutcome::Completed(report)) => {
            tracing::info!(
                seen = report.seen,
                inserted = report.inserted,
                guides_created = report.guides_created,
                synthesis_failed = report.synthesis_failed,
                "scheduler: ingestion cycle complete"
            );
        }
        Ok(CycleOutcome::Skipped) => {
            tracing::info!("scheduler: ingestion cycle skipped, another is running");
        }
        Err(IngestError::Cancelled) => {
            tracing::info!("scheduler: ingestion cycle cancelled by shutdown");
        }
        Err(e) => {
            tracing::error!(error = %e, "scheduler: ingestion cycle failed");
        }
    }
}
