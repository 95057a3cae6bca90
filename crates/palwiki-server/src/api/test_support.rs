//! Shared fixtures for router tests: an in-memory store and a stub
//! synthesizer wired into a full `AppState`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use palwiki_ingest::{
    ContentSynthesizer, IngestService, IngestionPipeline, MemoryStore, ShutdownSignal,
    SynthesisError,
};
use palwiki_scraper::NewsClient;
use tower::ServiceExt;

use super::{build_app, default_rate_limit_state, AppState};

/// Replies with a fixed answer, or fails while `failing` is set.
pub(crate) struct StubSynthesizer {
    pub answer: String,
    pub failing: AtomicBool,
}

#[async_trait]
impl ContentSynthesizer for StubSynthesizer {
    async fn generate(&self, _prompt: &str) -> Result<String, SynthesisError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SynthesisError::Failed("stub failure".to_string()));
        }
        Ok(self.answer.clone())
    }
}

pub(crate) struct Harness {
    pub store: Arc<MemoryStore>,
    pub synth: Arc<StubSynthesizer>,
    pub generate_max_chars: usize,
    pub shutdown: ShutdownSignal,
}

impl Harness {
    pub fn app(&self) -> Router {
        let pipeline =
            IngestionPipeline::new(self.store.clone(), self.synth.clone(), Duration::from_secs(5));
        let fetcher = NewsClient::new(5, "palwiki-test/0.1").expect("news client");
        let ingest = IngestService::new(
            pipeline,
            fetcher,
            "http://127.0.0.1:9/news",
            self.shutdown.clone(),
        );
        build_app(
            AppState {
                store: self.store.clone(),
                ingest: Arc::new(ingest),
                synthesizer: self.synth.clone(),
                generate_max_chars: self.generate_max_chars,
                shutdown: self.shutdown.clone(),
            },
            default_rate_limit_state(),
        )
    }
}

pub(crate) fn harness() -> Harness {
    harness_with_answer("生成的攻略内容")
}

pub(crate) fn harness_with_answer(answer: &str) -> Harness {
    Harness {
        store: Arc::new(MemoryStore::new()),
        synth: Arc::new(StubSynthesizer {
            answer: answer.to_string(),
            failing: AtomicBool::new(false),
        }),
        generate_max_chars: 2000,
        shutdown: ShutdownSignal::new(),
    }
}

pub(crate) async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

pub(crate) async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(
        app,
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request"),
    )
    .await
}

pub(crate) async fn post_json(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
    )
    .await
}
