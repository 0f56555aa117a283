//! Route definitions for media items.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// Routes mounted at `/media`.
///
/// ```text
/// GET    /                  list_media (?status)
/// POST   /upload            upload_media (multipart)
/// GET    /{id}              get_media
/// GET    /{id}/file         get_media_file
/// GET    /{id}/history      get_media_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(media::list_media))
        .route("/upload", post(media::upload_media))
        .route("/{id}", get(media::get_media))
        .route("/{id}/file", get(media::get_media_file))
        .route("/{id}/history", get(media::get_media_history))
}
