//! Handlers for stepping through items one at a time.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedQuery;
use crate::query::CurrentIdParams;
use crate::state::AppState;

/// GET /api/next?current_id=
///
/// The pending item with the smallest id above `current_id` (default 0).
pub async fn next_media(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<CurrentIdParams>,
) -> AppResult<impl IntoResponse> {
    let current_id = params.current_id.unwrap_or(0);

    let body = match state.store.next_unannotated(current_id).await? {
        Some(media) => json!({ "media": media, "has_next": true }),
        None => json!({ "message": "No more media to annotate", "has_next": false }),
    };
    Ok(Json(body))
}

/// GET /api/prev?current_id=
///
/// The item with the largest id below `current_id`, whatever its status.
pub async fn previous_media(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<CurrentIdParams>,
) -> AppResult<impl IntoResponse> {
    let current_id = params
        .current_id
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest("current_id is required".into()))?;

    let body = match state.store.previous(current_id).await? {
        Some(media) => json!({ "media": media, "has_prev": true }),
        None => json!({ "message": "No previous media", "has_prev": false }),
    };
    Ok(Json(body))
}
