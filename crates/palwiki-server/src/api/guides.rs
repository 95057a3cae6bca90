use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use palwiki_ingest::Guide;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct GuidesQuery {
    pub category: Option<String>,
    /// Title fragment, matched case-insensitively.
    pub q: Option<String>,
}

/// Trimmed value, or `None` when absent or blank.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Lists guides newest first, optionally narrowed by `category` or `q`.
///
/// The two filters are exclusive; passing both is a validation error.
pub(super) async fn list_guides(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<GuidesQuery>,
) -> Result<Json<ApiResponse<Vec<Guide>>>, ApiError> {
    let category = non_blank(query.category.as_deref());
    let fragment = non_blank(query.q.as_deref());

    let result = match (category, fragment) {
        (Some(_), Some(_)) => {
            return Err(ApiError::new(
                req_id.0,
                "validation_error",
                "use either category or q, not both",
            ));
        }
        (Some(category), None) => state.store.list_guides_by_category(category).await,
        (None, Some(fragment)) => state.store.search_guides(fragment).await,
        (None, None) => state.store.list_guides().await,
    };
    let data = result.map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_guide(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<Guide>>, ApiError> {
    let Ok(id) = raw_id.parse::<i64>() else {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            format!("invalid guide id: {raw_id}"),
        ));
    };

    let data = state
        .store
        .get_guide(id)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
