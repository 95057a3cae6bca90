//! Operator endpoint for manual topic generation.

use axum::{extract::State, Extension, Json};
use palwiki_ingest::PipelineReport;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct TopicRequest {
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub(super) struct TopicResponse {
    message: &'static str,
    report: PipelineReport,
}

/// Runs one topic through the ingestion pipeline.
///
/// A failed synthesis still answers 200; the report carries the counts.
pub(super) async fn create_topic_guide(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<TopicRequest>,
) -> Result<Json<ApiResponse<TopicResponse>>, ApiError> {
    let topic = body.topic.trim();
    if topic.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "topic must not be empty",
        ));
    }

    let report = state.ingest.ingest_topic(topic).await.map_err(|e| {
        tracing::error!(error = %e, topic, "manual topic ingestion failed");
        ApiError::new(req_id.0.clone(), "internal_error", "guide generation failed")
    })?;

    Ok(Json(ApiResponse {
        data: TopicResponse {
            message: "guide generation complete",
            report,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
