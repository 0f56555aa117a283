//! Request handlers for the annotation API.
//!
//! Handlers delegate to the [`MediaStore`](markup_db::MediaStore) held in
//! [`AppState`](crate::state::AppState) and map errors via
//! [`AppError`](crate::error::AppError).

pub mod annotation;
pub mod export;
pub mod maintenance;
pub mod media;
pub mod navigation;
pub mod stats;

use markup_core::error::CoreError;
use markup_core::types::DbId;
use markup_db::models::media::MediaItem;
use markup_db::MediaStore;

use crate::error::{AppError, AppResult};

/// Load a media item or fail with a 404.
pub(crate) async fn find_media(store: &dyn MediaStore, id: DbId) -> AppResult<MediaItem> {
    store.find_by_id(id).await?.ok_or(AppError::Core(CoreError::NotFound {
        entity: "Media",
        id,
    }))
}
