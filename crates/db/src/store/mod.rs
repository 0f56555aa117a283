//! The media store contract.
//!
//! Handlers depend on [`MediaStore`] only, so the same traversal and stats
//! behaviour holds for the PostgreSQL backing used in production and the
//! in-memory backing used by tests and throwaway runs.

mod memory;
mod postgres;

pub use memory::MemoryMediaStore;
pub use postgres::PgMediaStore;

use async_trait::async_trait;
use markup_core::annotation::{AnnotationPatch, AnnotationStatus};
use markup_core::stats::MediaStats;
use markup_core::types::DbId;

use crate::models::history::AnnotationHistoryEntry;
use crate::models::media::{CreateMediaItem, MediaItem};

/// Failure of the storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An item with this filename already exists.
    #[error("Media with filename '{0}' already exists")]
    DuplicateFilename(String),
}

/// Storage operations over media items and their annotation state.
///
/// Lookups of unknown ids return `Ok(None)`; errors are reserved for storage
/// failures. Every mutating call is atomic.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Create an item with all annotation fields empty.
    async fn create(&self, input: &CreateMediaItem) -> Result<MediaItem, StoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<MediaItem>, StoreError>;

    async fn find_by_filename(&self, filename: &str) -> Result<Option<MediaItem>, StoreError>;

    /// Apply a partial annotation update. Omitted fields keep their value.
    async fn update_annotation(
        &self,
        id: DbId,
        patch: &AnnotationPatch,
    ) -> Result<Option<MediaItem>, StoreError>;

    /// Every item, newest first (ties broken by id descending).
    async fn list_all(&self) -> Result<Vec<MediaItem>, StoreError>;

    /// Pending items by id ascending, or completed items by last update.
    async fn list_by_status(&self, status: AnnotationStatus)
        -> Result<Vec<MediaItem>, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;

    /// Clear all annotation fields, keeping the items. Returns rows touched.
    async fn reset_all(&self) -> Result<u64, StoreError>;

    /// First pending item with an id above `current_id` (0 = from the start).
    async fn next_unannotated(&self, current_id: DbId) -> Result<Option<MediaItem>, StoreError>;

    /// Item with the largest id below `current_id`.
    async fn previous(&self, current_id: DbId) -> Result<Option<MediaItem>, StoreError>;

    async fn stats(&self) -> Result<MediaStats, StoreError>;

    /// Annotation history for one item, newest first.
    async fn history(&self, media_id: DbId) -> Result<Vec<AnnotationHistoryEntry>, StoreError>;

    /// Whether the backend is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;
}
