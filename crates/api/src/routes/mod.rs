pub mod health;
pub mod media;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /media                    list (?status=pending|completed)
/// /media/upload             multipart upload (POST)
/// /media/{id}               get
/// /media/{id}/file          stored file bytes
/// /media/{id}/history       annotation history
///
/// /annotate                 submit annotation (POST)
/// /stats                    aggregate statistics
///
/// /next                     next pending item (?current_id)
/// /prev                     previous item (?current_id)
///
/// /scan                     register files in the upload folder (POST)
/// /reset                    clear all annotations (POST)
/// /export                   all results as records and CSV
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/media", media::router())
        .route("/annotate", post(handlers::annotation::submit_annotation))
        .route("/stats", get(handlers::stats::get_stats))
        .route("/next", get(handlers::navigation::next_media))
        .route("/prev", get(handlers::navigation::previous_media))
        .route("/scan", post(handlers::maintenance::scan_upload_folder))
        .route("/reset", post(handlers::maintenance::reset_annotations))
        .route("/export", get(handlers::export::export_results))
}
