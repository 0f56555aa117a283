use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use markup_core::annotation::{Annotated, AnnotationPatch, AnnotationStatus, AnnotationValues};
use markup_core::stats::{compute_stats, MediaStats};
use markup_core::traversal;
use markup_core::types::DbId;
use sqlx::types::Json;
use tokio::sync::RwLock;

use super::{MediaStore, StoreError};
use crate::models::history::{AnnotationHistoryEntry, HistoryAction, HISTORY_LIMIT};
use crate::models::media::{CreateMediaItem, MediaItem};

/// [`MediaStore`] kept entirely in process memory.
///
/// Every operation takes the lock once for its whole duration, which gives
/// the same atomicity a database transaction would. Contents are lost when
/// the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryMediaStore {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    items: BTreeMap<DbId, MediaItem>,
    history: Vec<AnnotationHistoryEntry>,
    last_item_id: DbId,
    last_history_id: DbId,
}

impl MemoryState {
    fn record(
        &mut self,
        media_id: DbId,
        action: HistoryAction,
        previous: AnnotationValues,
        next: AnnotationValues,
    ) {
        self.last_history_id += 1;
        self.history.push(AnnotationHistoryEntry {
            id: self.last_history_id,
            media_id,
            action: action.as_str().to_string(),
            previous_values: Json(previous),
            new_values: Json(next),
            changed_at: Utc::now(),
        });
    }
}

impl MemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn create(&self, input: &CreateMediaItem) -> Result<MediaItem, StoreError> {
        let mut state = self.state.write().await;

        if state.items.values().any(|i| i.filename == input.filename) {
            return Err(StoreError::DuplicateFilename(input.filename.clone()));
        }

        state.last_item_id += 1;
        let now = Utc::now();
        let item = MediaItem {
            id: state.last_item_id,
            filename: input.filename.clone(),
            filepath: input.filepath.clone(),
            media_type: input.media_type.as_str().to_string(),
            title: input.resolved_title(),
            emotion: None,
            valence: None,
            arousal: None,
            created_at: now,
            updated_at: now,
        };
        state.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<MediaItem>, StoreError> {
        Ok(self.state.read().await.items.get(&id).cloned())
    }

    async fn find_by_filename(&self, filename: &str) -> Result<Option<MediaItem>, StoreError> {
        let state = self.state.read().await;
        Ok(state.items.values().find(|i| i.filename == filename).cloned())
    }

    async fn update_annotation(
        &self,
        id: DbId,
        patch: &AnnotationPatch,
    ) -> Result<Option<MediaItem>, StoreError> {
        let mut state = self.state.write().await;

        let Some(item) = state.items.get_mut(&id) else {
            return Ok(None);
        };

        let previous = item.annotation_values();
        let next = patch.apply(previous);

        item.emotion = next.emotion.map(|e| e.as_str().to_string());
        item.valence = next.valence;
        item.arousal = next.arousal;
        item.updated_at = Utc::now();
        let updated = item.clone();

        state.record(id, HistoryAction::Update, previous, next);
        Ok(Some(updated))
    }

    async fn list_all(&self) -> Result<Vec<MediaItem>, StoreError> {
        let state = self.state.read().await;
        let mut items: Vec<MediaItem> = state.items.values().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(items)
    }

    async fn list_by_status(
        &self,
        status: AnnotationStatus,
    ) -> Result<Vec<MediaItem>, StoreError> {
        let state = self.state.read().await;
        let mut items: Vec<MediaItem> = state
            .items
            .values()
            .filter(|i| i.status() == status)
            .cloned()
            .collect();
        if status == AnnotationStatus::Completed {
            items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        }
        Ok(items)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.state.read().await.items.len() as i64)
    }

    async fn reset_all(&self) -> Result<u64, StoreError> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let mut cleared = Vec::new();

        for item in state.items.values_mut() {
            let previous = item.annotation_values();
            if !previous.is_empty() {
                cleared.push((item.id, previous));
            }
            item.emotion = None;
            item.valence = None;
            item.arousal = None;
            item.updated_at = now;
        }

        for (id, previous) in cleared {
            state.record(id, HistoryAction::Reset, previous, AnnotationValues::default());
        }
        Ok(state.items.len() as u64)
    }

    async fn next_unannotated(&self, current_id: DbId) -> Result<Option<MediaItem>, StoreError> {
        let state = self.state.read().await;
        Ok(traversal::next_unannotated(state.items.values(), current_id).cloned())
    }

    async fn previous(&self, current_id: DbId) -> Result<Option<MediaItem>, StoreError> {
        let state = self.state.read().await;
        Ok(traversal::previous(state.items.values(), current_id).cloned())
    }

    async fn stats(&self) -> Result<MediaStats, StoreError> {
        let state = self.state.read().await;
        Ok(compute_stats(state.items.values()))
    }

    async fn history(&self, media_id: DbId) -> Result<Vec<AnnotationHistoryEntry>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .history
            .iter()
            .rev()
            .filter(|h| h.media_id == media_id)
            .take(HISTORY_LIMIT as usize)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
