//! Annotation history model.

use markup_core::annotation::AnnotationValues;
use markup_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// Maximum number of history entries returned for one item.
pub const HISTORY_LIMIT: i64 = 50;

/// What kind of change a history entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    Update,
    Reset,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Reset => "reset",
        }
    }
}

/// A row from the `annotation_history` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AnnotationHistoryEntry {
    pub id: DbId,
    pub media_id: DbId,
    pub action: String,
    pub previous_values: Json<AnnotationValues>,
    pub new_values: Json<AnnotationValues>,
    pub changed_at: Timestamp,
}
