mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;
use std::time::Duration;

use palwiki_gemini::GeminiClient;
use palwiki_ingest::{IngestService, IngestionPipeline, PgStore, ShutdownSignal};
use palwiki_scraper::NewsClient;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, default_rate_limit_state, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = palwiki_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::info!(env = %config.env, bind_addr = %config.bind_addr, "starting palwiki server");

    let pool_config = palwiki_db::PoolConfig::from_app_config(&config);
    let pool = palwiki_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = palwiki_db::run_migrations(&pool).await?;
    tracing::info!(applied, "database migrations complete");

    let store = Arc::new(PgStore::new(pool));
    let synthesizer = Arc::new(GeminiClient::with_base_url(
        &config.gemini_api_key,
        &config.gemini_model,
        config.synthesis_timeout_secs,
        &config.gemini_base_url,
    )?);
    let fetcher = NewsClient::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
    )?;

    let shutdown = ShutdownSignal::new();
    let pipeline = IngestionPipeline::new(
        store.clone(),
        synthesizer.clone(),
        Duration::from_secs(config.synthesis_timeout_secs),
    );
    let ingest = Arc::new(IngestService::new(
        pipeline,
        fetcher,
        config.news_url.clone(),
        shutdown.clone(),
    ));

    let mut scheduler = scheduler::build_scheduler(
        Arc::clone(&ingest),
        Duration::from_secs(config.ingest_interval_secs),
    )
    .await?;

    let app = build_app(
        AppState {
            store,
            ingest,
            synthesizer,
            generate_max_chars: config.generate_max_chars,
            shutdown: shutdown.clone(),
        },
        default_rate_limit_state(),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let server_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            server_shutdown.trigger();
        })
        .await?;

    if let Err(e) = scheduler.shutdown().await {
        tracing::warn!(error = %e, "scheduler shutdown failed");
    }
    tracing::info!("palwiki server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
