//! Handler for exporting all annotation results.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use markup_core::annotation::Annotated;
use markup_core::export::{csv_record, MEDIA_CSV_HEADER};
use markup_db::models::media::MediaItem;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/export
///
/// Every item as structured records plus the same data as CSV text.
pub async fn export_results(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let results = state.store.list_all().await?;
    let annotated = results.iter().filter(|item| item.is_completed()).count();
    let csv = render_csv(&results);

    tracing::info!(total = results.len(), annotated, "Results exported");

    Ok(Json(json!({
        "total": results.len(),
        "annotated": annotated,
        "csv": csv,
        "results": results,
    })))
}

/// Render items as CSV with a header row.
fn render_csv(items: &[MediaItem]) -> String {
    let mut csv = String::from(MEDIA_CSV_HEADER);
    csv.push('\n');
    for item in items {
        csv.push_str(&csv_record(&[
            item.id.to_string(),
            item.filename.clone(),
            item.filepath.clone(),
            item.media_type.clone(),
            item.emotion.clone().unwrap_or_default(),
            item.valence.map(|v| v.to_string()).unwrap_or_default(),
            item.arousal.map(|v| v.to_string()).unwrap_or_default(),
            item.status().to_string(),
            item.created_at.to_rfc3339(),
            item.updated_at.to_rfc3339(),
        ]));
    }
    csv
}
