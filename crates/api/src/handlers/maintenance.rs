//! Handlers that act on the whole collection: folder scan and reset.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use markup_db::models::media::CreateMediaItem;
use markup_db::StoreError;

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::uploads;

/// POST /api/scan
///
/// Register every media file in the upload folder that the store does not
/// know yet. Returns only the newly created items.
pub async fn scan_upload_folder(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let upload_dir = &state.config.upload_dir;
    let names = uploads::list_media_files(upload_dir)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let mut created = Vec::new();
    for name in names {
        if state.store.find_by_filename(&name).await?.is_some() {
            continue;
        }
        let path = uploads::stored_path(upload_dir, &name);
        let Some(input) = CreateMediaItem::for_file(&name, &path.to_string_lossy()) else {
            continue;
        };
        match state.store.create(&input).await {
            Ok(item) => created.push(item),
            // Registered concurrently by an upload; nothing new to report.
            Err(StoreError::DuplicateFilename(_)) => continue,
            Err(e) => return Err(e.into()),
        }
    }

    let total = state.store.count().await?;

    tracing::info!(new_files = created.len(), total, "Upload folder scanned");

    Ok(Json(json!({
        "message": format!("Found {} new files", created.len()),
        "files": created,
        "total": total,
    })))
}

/// POST /api/reset
///
/// Clear every annotation. Items and files are kept.
pub async fn reset_annotations(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let reset = state.store.reset_all().await?;
    let total = state.store.count().await?;

    tracing::info!(reset, total, "Annotations reset");

    Ok(Json(json!({
        "message": "Annotations reset successfully",
        "reset": reset,
        "total": total,
        "annotated": 0,
    })))
}
