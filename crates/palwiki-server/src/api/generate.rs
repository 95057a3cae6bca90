//! Direct question pass-through to the synthesizer.

use axum::{extract::State, Extension, Json};
use palwiki_ingest::{build_question_prompt, NewUserQuery};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

const TRUNCATION_MARKER: &str = "...";

#[derive(Debug, Deserialize)]
pub(super) struct GenerateRequest {
    pub prompt: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct GenerateResponse {
    content: String,
}

pub(super) async fn generate(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<ApiResponse<GenerateResponse>>, ApiError> {
    let question = body.prompt.trim();
    if question.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "prompt must not be empty",
        ));
    }

    let prompt = build_question_prompt(question);
    let generated = tokio::select! {
        biased;
        () = state.shutdown.cancelled() => {
            return Err(ApiError::new(
                req_id.0,
                "shutting_down",
                "server is shutting down",
            ));
        }
        result = state.synthesizer.generate(&prompt) => result,
    };
    let answer = generated.map_err(|e| {
        tracing::error!(error = %e, "gemini generate failed");
        ApiError::new(req_id.0.clone(), "upstream_error", "content generation failed")
    })?;
    let content = truncate_chars(&answer, state.generate_max_chars);

    let query = NewUserQuery {
        user_id: body.user_id,
        query_text: question.to_string(),
        ai_response: content.clone(),
    };
    if let Err(e) = state.store.record_query(&query).await {
        tracing::warn!(error = %e, "failed to record user query");
    }

    Ok(Json(ApiResponse {
        data: GenerateResponse { content },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Keeps the first `max_chars` characters, appending `...` when cut.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &text[..cut]),
        None => text.to_string(),
    }
}
