//! Handlers for listing, fetching, serving and uploading media items.

use axum::extract::{Multipart, Path, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use validator::Validate;

use markup_core::emotion::EMOTIONS;
use markup_core::error::CoreError;
use markup_core::media::{is_allowed_file, sanitize_filename};
use markup_core::types::DbId;
use markup_db::models::media::{CreateMediaItem, MediaItem};

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedQuery;
use crate::handlers::find_media;
use crate::query::MediaListParams;
use crate::state::AppState;
use crate::uploads;

/// GET /api/media
///
/// All items newest first, or only those with the given `?status=`. The
/// response also carries the emotion vocabulary for the client's picker.
pub async fn list_media(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<MediaListParams>,
) -> AppResult<impl IntoResponse> {
    let items = match params.status {
        Some(status) => state.store.list_by_status(status).await?,
        None => state.store.list_all().await?,
    };

    Ok(Json(json!({
        "total": items.len(),
        "items": items,
        "emotions": EMOTIONS,
    })))
}

/// GET /api/media/{id}
pub async fn get_media(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MediaItem>> {
    let item = find_media(state.store.as_ref(), id).await?;
    Ok(Json(item))
}

/// GET /api/media/{id}/file
///
/// Streams the stored file. When the file is gone from disk a JSON notice
/// with `placeholder: true` is returned instead so clients can render a stub.
pub async fn get_media_file(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    request: Request,
) -> AppResult<Response> {
    let item = find_media(state.store.as_ref(), id).await?;

    let exists = tokio::fs::try_exists(&item.filepath)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    if !exists {
        tracing::warn!(media_id = id, filepath = %item.filepath, "Media file missing on disk");
        let kind = if item.media_type == "video" {
            "Video"
        } else {
            "Image"
        };
        return Ok(Json(json!({
            "message": format!("{kind} placeholder for media {id}"),
            "placeholder": true,
        }))
        .into_response());
    }

    let response = ServeFile::new(&item.filepath)
        .oneshot(request)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    Ok(response.into_response())
}

/// GET /api/media/{id}/history
///
/// Most recent annotation changes for an item, newest first.
pub async fn get_media_history(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    find_media(state.store.as_ref(), id).await?;
    let history = state.store.history(id).await?;
    Ok(Json(json!({
        "media_id": id,
        "history": history,
    })))
}

/// POST /api/media/upload
///
/// Accepts a multipart form with a required `file` field. The file is written
/// to the upload folder under its sanitised name and registered as a pending
/// item. A filename that is already registered, or already present in the
/// folder, is rejected with 409. If registration fails the written file is
/// removed again.
pub async fn upload_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<MediaItem>)> {
    let mut file_data: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        file_data = Some((filename, data.to_vec()));
    }

    let (raw_name, data) =
        file_data.ok_or_else(|| AppError::BadRequest("No file provided".into()))?;
    if raw_name.trim().is_empty() {
        return Err(AppError::BadRequest("No file selected".into()));
    }
    if !is_allowed_file(&raw_name) {
        return Err(AppError::BadRequest("File type not allowed".into()));
    }

    let filename = sanitize_filename(&raw_name)
        .filter(|name| is_allowed_file(name))
        .ok_or_else(|| AppError::BadRequest(format!("Invalid filename '{raw_name}'")))?;

    if state.store.find_by_filename(&filename).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Media with filename '{filename}' already exists"
        ))));
    }

    let upload_dir = &state.config.upload_dir;
    let filepath = uploads::stored_path(upload_dir, &filename);
    let input = CreateMediaItem::for_file(&filename, &filepath.to_string_lossy())
        .ok_or_else(|| AppError::BadRequest("File type not allowed".into()))?;
    input.validate()?;

    let saved_path = uploads::save_upload(upload_dir, &filename, &data)
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => AppError::Core(CoreError::Conflict(format!(
                "File '{filename}' already exists in the upload folder"
            ))),
            _ => AppError::InternalError(e.to_string()),
        })?;

    let item = match state.store.create(&input).await {
        Ok(item) => item,
        Err(e) => {
            uploads::discard_upload(&saved_path).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        media_id = item.id,
        filename = %item.filename,
        media_type = %item.media_type,
        size_bytes = data.len(),
        "Media uploaded",
    );

    Ok((StatusCode::CREATED, Json(item)))
}
