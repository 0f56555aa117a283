//! Repository for the `annotation_history` table.
//!
//! Writes take a connection rather than the pool so they always run inside
//! the caller's transaction.

use markup_core::annotation::AnnotationValues;
use markup_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use crate::models::history::{AnnotationHistoryEntry, HistoryAction, HISTORY_LIMIT};

/// Column list for annotation_history queries.
const COLUMNS: &str = "id, media_id, action, previous_values, new_values, changed_at";

/// Provides append and read operations for annotation history.
pub struct AnnotationHistoryRepo;

impl AnnotationHistoryRepo {
    /// Append one history entry.
    pub async fn insert(
        conn: &mut PgConnection,
        media_id: DbId,
        action: HistoryAction,
        previous: &AnnotationValues,
        next: &AnnotationValues,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO annotation_history (media_id, action, previous_values, new_values)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(media_id)
        .bind(action.as_str())
        .bind(Json(previous))
        .bind(Json(next))
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Append a `reset` entry for every item that currently carries any
    /// annotation field. Must run before the fields are cleared.
    pub async fn record_reset(
        conn: &mut PgConnection,
        cleared: &AnnotationValues,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO annotation_history (media_id, action, previous_values, new_values)
             SELECT id, $1,
                    jsonb_build_object('emotion', emotion, 'valence', valence, 'arousal', arousal),
                    $2
             FROM media_items
             WHERE emotion IS NOT NULL OR valence IS NOT NULL OR arousal IS NOT NULL",
        )
        .bind(HistoryAction::Reset.as_str())
        .bind(Json(cleared))
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Most recent history entries for an item, newest first.
    pub async fn list_by_media(
        pool: &PgPool,
        media_id: DbId,
    ) -> Result<Vec<AnnotationHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM annotation_history
             WHERE media_id = $1
             ORDER BY changed_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, AnnotationHistoryEntry>(&query)
            .bind(media_id)
            .bind(HISTORY_LIMIT)
            .fetch_all(pool)
            .await
    }
}
