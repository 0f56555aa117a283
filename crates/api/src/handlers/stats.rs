use axum::extract::State;
use axum::Json;
use markup_core::stats::MediaStats;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<MediaStats>> {
    let stats = state.store.stats().await?;
    Ok(Json(stats))
}
