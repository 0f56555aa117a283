use async_trait::async_trait;
use markup_core::annotation::{AnnotationPatch, AnnotationStatus};
use markup_core::stats::MediaStats;
use markup_core::types::DbId;
use sqlx::PgPool;

use super::{MediaStore, StoreError};
use crate::models::history::AnnotationHistoryEntry;
use crate::models::media::{CreateMediaItem, MediaItem};
use crate::repositories::{AnnotationHistoryRepo, MediaItemRepo};

/// Unique index guarding against two items with the same filename.
const FILENAME_UNIQUE_INDEX: &str = "uq_media_items_filename";

/// [`MediaStore`] backed by PostgreSQL through the repository layer.
#[derive(Debug, Clone)]
pub struct PgMediaStore {
    pool: PgPool,
}

impl PgMediaStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl MediaStore for PgMediaStore {
    #[tracing::instrument(skip(self, input), fields(filename = %input.filename))]
    async fn create(&self, input: &CreateMediaItem) -> Result<MediaItem, StoreError> {
        MediaItemRepo::create(&self.pool, input)
            .await
            .map_err(|err| {
                if is_filename_conflict(&err) {
                    StoreError::DuplicateFilename(input.filename.clone())
                } else {
                    StoreError::Database(err)
                }
            })
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<MediaItem>, StoreError> {
        Ok(MediaItemRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_by_filename(&self, filename: &str) -> Result<Option<MediaItem>, StoreError> {
        Ok(MediaItemRepo::find_by_filename(&self.pool, filename).await?)
    }

    #[tracing::instrument(skip(self, patch))]
    async fn update_annotation(
        &self,
        id: DbId,
        patch: &AnnotationPatch,
    ) -> Result<Option<MediaItem>, StoreError> {
        Ok(MediaItemRepo::update_annotation(&self.pool, id, patch).await?)
    }

    async fn list_all(&self) -> Result<Vec<MediaItem>, StoreError> {
        Ok(MediaItemRepo::list_all(&self.pool).await?)
    }

    async fn list_by_status(
        &self,
        status: AnnotationStatus,
    ) -> Result<Vec<MediaItem>, StoreError> {
        Ok(MediaItemRepo::list_by_status(&self.pool, status).await?)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(MediaItemRepo::count(&self.pool).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn reset_all(&self) -> Result<u64, StoreError> {
        Ok(MediaItemRepo::reset_all(&self.pool).await?)
    }

    async fn next_unannotated(&self, current_id: DbId) -> Result<Option<MediaItem>, StoreError> {
        Ok(MediaItemRepo::next_unannotated(&self.pool, current_id).await?)
    }

    async fn previous(&self, current_id: DbId) -> Result<Option<MediaItem>, StoreError> {
        Ok(MediaItemRepo::previous(&self.pool, current_id).await?)
    }

    async fn stats(&self) -> Result<MediaStats, StoreError> {
        let totals = MediaItemRepo::stats(&self.pool).await?;
        Ok(totals.summarize())
    }

    async fn history(&self, media_id: DbId) -> Result<Vec<AnnotationHistoryEntry>, StoreError> {
        Ok(AnnotationHistoryRepo::list_by_media(&self.pool, media_id).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}

/// Whether an insert failed on the filename unique index (SQLSTATE 23505).
fn is_filename_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some(FILENAME_UNIQUE_INDEX)
        }
        _ => false,
    }
}
