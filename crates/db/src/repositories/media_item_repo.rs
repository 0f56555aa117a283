//! Repository for the `media_items` table.

use markup_core::annotation::{AnnotationPatch, AnnotationStatus, AnnotationValues};
use markup_core::stats::StatsTotals;
use markup_core::types::DbId;
use sqlx::PgPool;

use crate::models::history::HistoryAction;
use crate::models::media::{CreateMediaItem, MediaItem};
use crate::repositories::AnnotationHistoryRepo;

/// Column list for media_items queries.
const COLUMNS: &str = "id, filename, filepath, type, title, emotion, valence, arousal, \
    created_at, updated_at";

/// SQL predicate matching items whose status is pending.
const PENDING: &str = "(emotion IS NULL OR valence IS NULL OR arousal IS NULL)";

/// SQL predicate matching items whose status is completed.
const COMPLETED: &str = "(emotion IS NOT NULL AND valence IS NOT NULL AND arousal IS NOT NULL)";

/// Provides CRUD and traversal queries for media items.
pub struct MediaItemRepo;

impl MediaItemRepo {
    /// Insert a new item with empty annotation fields, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateMediaItem) -> Result<MediaItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO media_items (filename, filepath, type, title)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MediaItem>(&query)
            .bind(&input.filename)
            .bind(&input.filepath)
            .bind(input.media_type.as_str())
            .bind(input.resolved_title())
            .fetch_one(pool)
            .await
    }

    /// Find an item by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MediaItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM media_items WHERE id = $1");
        sqlx::query_as::<_, MediaItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an item by its stored filename.
    pub async fn find_by_filename(
        pool: &PgPool,
        filename: &str,
    ) -> Result<Option<MediaItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM media_items WHERE filename = $1");
        sqlx::query_as::<_, MediaItem>(&query)
            .bind(filename)
            .fetch_optional(pool)
            .await
    }

    /// List every item, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<MediaItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM media_items
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, MediaItem>(&query).fetch_all(pool).await
    }

    /// List items with the given status.
    ///
    /// Pending items come back in id order (annotation order), completed ones
    /// most recently updated first.
    pub async fn list_by_status(
        pool: &PgPool,
        status: AnnotationStatus,
    ) -> Result<Vec<MediaItem>, sqlx::Error> {
        let query = match status {
            AnnotationStatus::Pending => format!(
                "SELECT {COLUMNS} FROM media_items WHERE {PENDING} ORDER BY id ASC"
            ),
            AnnotationStatus::Completed => format!(
                "SELECT {COLUMNS} FROM media_items WHERE {COMPLETED}
                 ORDER BY updated_at DESC, id DESC"
            ),
        };
        sqlx::query_as::<_, MediaItem>(&query).fetch_all(pool).await
    }

    /// Count all items.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM media_items")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Aggregate counts and valence/arousal figures for the stats endpoint.
    ///
    /// All four queries run in one repeatable-read transaction so they see
    /// the same snapshot.
    pub async fn stats(pool: &PgPool) -> Result<StatsTotals, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let (total_media,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM media_items")
            .fetch_one(&mut *tx)
            .await?;

        let type_counts: Vec<(String, i64)> =
            sqlx::query_as("SELECT type, COUNT(*) FROM media_items GROUP BY type")
                .fetch_all(&mut *tx)
                .await?;

        let query = format!(
            "SELECT emotion, COUNT(*) FROM media_items WHERE {COMPLETED} GROUP BY emotion"
        );
        let emotion_counts: Vec<(String, i64)> =
            sqlx::query_as(&query).fetch_all(&mut *tx).await?;

        let query = format!(
            "SELECT AVG(valence), AVG(arousal), STDDEV_SAMP(valence), STDDEV_SAMP(arousal)
             FROM media_items
             WHERE {COMPLETED}"
        );
        let (avg_valence, avg_arousal, std_valence, std_arousal): (
            Option<f64>,
            Option<f64>,
            Option<f64>,
            Option<f64>,
        ) = sqlx::query_as(&query).fetch_one(&mut *tx).await?;

        tx.commit().await?;

        Ok(StatsTotals {
            total_media,
            emotion_counts: emotion_counts.into_iter().collect(),
            type_counts: type_counts.into_iter().collect(),
            avg_valence,
            avg_arousal,
            std_valence,
            std_arousal,
        })
    }

    /// Apply a partial annotation update, recording it in the history log.
    ///
    /// The row is locked for the duration of the transaction so a concurrent
    /// update cannot interleave between the read and the write. Returns
    /// `None` if no item has the given ID.
    pub async fn update_annotation(
        pool: &PgPool,
        id: DbId,
        patch: &AnnotationPatch,
    ) -> Result<Option<MediaItem>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM media_items WHERE id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, MediaItem>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(current) = current else {
            return Ok(None);
        };

        let previous = current.annotation_values();
        let next = patch.apply(previous);

        let query = format!(
            "UPDATE media_items SET
                emotion = $1,
                valence = $2,
                arousal = $3,
                updated_at = NOW()
             WHERE id = $4
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, MediaItem>(&query)
            .bind(next.emotion.map(|e| e.as_str()))
            .bind(next.valence)
            .bind(next.arousal)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        AnnotationHistoryRepo::insert(&mut *tx, id, HistoryAction::Update, &previous, &next).await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Clear emotion, valence and arousal on every item.
    ///
    /// Items that carried any annotation get a `reset` history entry. Returns
    /// the number of rows updated.
    pub async fn reset_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        AnnotationHistoryRepo::record_reset(&mut *tx, &AnnotationValues::default()).await?;

        let result = sqlx::query(
            "UPDATE media_items SET
                emotion = NULL,
                valence = NULL,
                arousal = NULL,
                updated_at = NOW()",
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }

    /// First pending item with an id greater than `current_id`.
    pub async fn next_unannotated(
        pool: &PgPool,
        current_id: DbId,
    ) -> Result<Option<MediaItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM media_items
             WHERE id > $1 AND {PENDING}
             ORDER BY id ASC
             LIMIT 1"
        );
        sqlx::query_as::<_, MediaItem>(&query)
            .bind(current_id.max(0))
            .fetch_optional(pool)
            .await
    }

    /// Item with the largest id below `current_id`, whatever its status.
    pub async fn previous(
        pool: &PgPool,
        current_id: DbId,
    ) -> Result<Option<MediaItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM media_items
             WHERE id < $1
             ORDER BY id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, MediaItem>(&query)
            .bind(current_id)
            .fetch_optional(pool)
            .await
    }
}
