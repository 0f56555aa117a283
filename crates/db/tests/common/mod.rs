//! Store contract checks shared by the in-memory and PostgreSQL test suites.
//!
//! Each check takes a fresh, empty store and asserts one behaviour of the
//! [`MediaStore`] contract.

#![allow(dead_code)]

use assert_matches::assert_matches;
use markup_core::annotation::{Annotated, AnnotationPatch, AnnotationStatus};
use markup_core::emotion::Emotion;
use markup_core::stats::VadSummary;
use markup_db::models::media::{CreateMediaItem, MediaItem};
use markup_db::{MediaStore, StoreError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn new_item(filename: &str) -> CreateMediaItem {
    CreateMediaItem::for_file(filename, &format!("uploads/{filename}"))
        .expect("test filenames use allowed extensions")
}

pub async fn seed(store: &dyn MediaStore, count: usize) -> Vec<MediaItem> {
    let mut items = Vec::with_capacity(count);
    for i in 1..=count {
        items.push(store.create(&new_item(&format!("sample{i}.jpg"))).await.unwrap());
    }
    items
}

fn patch(tag: Option<&str>, valence: Option<f64>, arousal: Option<f64>) -> AnnotationPatch {
    AnnotationPatch::new(tag, valence, arousal).unwrap()
}

pub async fn complete(store: &dyn MediaStore, id: i64) -> MediaItem {
    store
        .update_annotation(id, &patch(Some("happy"), Some(0.5), Some(0.5)))
        .await
        .unwrap()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Contract checks
// ---------------------------------------------------------------------------

pub async fn create_starts_pending(store: &dyn MediaStore) {
    let item = store.create(&new_item("cat.png")).await.unwrap();

    assert_eq!(item.filename, "cat.png");
    assert_eq!(item.filepath, "uploads/cat.png");
    assert_eq!(item.media_type, "image");
    assert_eq!(item.title, "cat");
    assert_eq!(item.emotion, None);
    assert_eq!(item.status(), AnnotationStatus::Pending);

    let fetched = store.find_by_id(item.id).await.unwrap().unwrap();
    assert_eq!(fetched.id, item.id);
}

pub async fn ids_are_monotonic(store: &dyn MediaStore) {
    let items = seed(store, 3).await;
    assert!(items[0].id < items[1].id);
    assert!(items[1].id < items[2].id);
}

pub async fn unknown_id_is_none(store: &dyn MediaStore) {
    assert!(store.find_by_id(999_999).await.unwrap().is_none());
    let updated = store
        .update_annotation(999_999, &patch(Some("sad"), None, None))
        .await
        .unwrap();
    assert!(updated.is_none());
}

pub async fn find_by_filename_and_duplicates(store: &dyn MediaStore) {
    let created = store.create(&new_item("dup.mp4")).await.unwrap();
    let found = store.find_by_filename("dup.mp4").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.media_type, "video");
    assert!(store.find_by_filename("missing.mp4").await.unwrap().is_none());

    let err = store.create(&new_item("dup.mp4")).await.unwrap_err();
    assert_matches!(err, StoreError::DuplicateFilename(name) if name == "dup.mp4");
}

pub async fn emotion_only_update_preserves_vad(store: &dyn MediaStore) {
    let item = store.create(&new_item("face.jpg")).await.unwrap();

    store
        .update_annotation(item.id, &patch(None, Some(0.3), Some(-0.7)))
        .await
        .unwrap()
        .unwrap();
    let updated = store
        .update_annotation(item.id, &patch(Some("surprise"), None, None))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.emotion.as_deref(), Some("surprise"));
    assert_eq!(updated.valence, Some(0.3));
    assert_eq!(updated.arousal, Some(-0.7));
    assert_eq!(updated.status(), AnnotationStatus::Completed);

    let reread = store.find_by_id(item.id).await.unwrap().unwrap();
    assert_eq!(reread.valence, Some(0.3));
    assert_eq!(reread.arousal, Some(-0.7));
}

pub async fn partial_annotation_is_pending(store: &dyn MediaStore) {
    let item = store.create(&new_item("half.gif")).await.unwrap();
    let updated = store
        .update_annotation(item.id, &patch(Some("neutral"), None, None))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.emotion.as_deref(), Some("neutral"));
    assert_eq!(updated.valence, None);
    assert_eq!(updated.status(), AnnotationStatus::Pending);
    assert!(updated.updated_at >= item.updated_at);
}

pub async fn next_and_previous_follow_id_order(store: &dyn MediaStore) {
    let items = seed(store, 3).await;
    let (first, second, third) = (items[0].id, items[1].id, items[2].id);
    complete(store, second).await;

    let next = store.next_unannotated(0).await.unwrap().unwrap();
    assert_eq!(next.id, first);
    let next = store.next_unannotated(first).await.unwrap().unwrap();
    assert_eq!(next.id, third);
    assert!(store.next_unannotated(third).await.unwrap().is_none());

    // Status does not matter going backwards.
    assert_eq!(store.previous(third).await.unwrap().unwrap().id, second);
    assert_eq!(store.previous(second).await.unwrap().unwrap().id, first);
    assert!(store.previous(first).await.unwrap().is_none());
}

pub async fn list_all_is_newest_first(store: &dyn MediaStore) {
    let items = seed(store, 3).await;
    let listed = store.list_all().await.unwrap();
    let ids: Vec<i64> = listed.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![items[2].id, items[1].id, items[0].id]);
    assert_eq!(store.count().await.unwrap(), 3);
}

pub async fn list_by_status_splits_items(store: &dyn MediaStore) {
    let items = seed(store, 4).await;
    complete(store, items[1].id).await;
    complete(store, items[3].id).await;

    let pending: Vec<i64> = store
        .list_by_status(AnnotationStatus::Pending)
        .await
        .unwrap()
        .iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(pending, vec![items[0].id, items[2].id]);

    let completed = store.list_by_status(AnnotationStatus::Completed).await.unwrap();
    assert_eq!(completed.len(), 2);
    assert!(completed.iter().all(|i| i.is_completed()));
}

pub async fn reset_clears_every_item(store: &dyn MediaStore) {
    let items = seed(store, 3).await;
    complete(store, items[0].id).await;
    store
        .update_annotation(items[1].id, &patch(Some("fear"), None, None))
        .await
        .unwrap();

    let touched = store.reset_all().await.unwrap();
    assert_eq!(touched, 3);

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total_media, 3);
    assert_eq!(stats.total_annotated, 0);
    assert_eq!(stats.pending, 3);

    for item in store.list_all().await.unwrap() {
        assert_eq!(item.emotion, None);
        assert_eq!(item.valence, None);
        assert_eq!(item.arousal, None);
    }
    assert_eq!(store.count().await.unwrap(), 3);
}

pub async fn stats_aggregate_completed_items(store: &dyn MediaStore) {
    let empty = store.stats().await.unwrap();
    assert_eq!(empty.completion_rate, 0.0);
    assert!(empty.type_summary.is_empty());
    assert_eq!(empty.vad_summary, VadSummary::default());

    let items = seed(store, 4).await;
    store.create(&new_item("clip.mov")).await.unwrap();
    store
        .update_annotation(items[0].id, &patch(Some("happy"), Some(1.0), Some(0.5)))
        .await
        .unwrap();
    store
        .update_annotation(items[1].id, &patch(Some("happy"), Some(0.0), Some(0.5)))
        .await
        .unwrap();
    store
        .update_annotation(items[2].id, &patch(Some("sad"), None, None))
        .await
        .unwrap();

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total_media, 5);
    assert_eq!(stats.total_annotated, 2);
    assert_eq!(stats.pending, 3);
    assert_eq!(stats.completion_rate, 40.0);
    assert_eq!(stats.emotion_summary.get("happy"), Some(&2));
    assert!(stats.emotion_summary.get("sad").is_none());
    assert_eq!(stats.type_summary.get("image"), Some(&4));
    assert_eq!(stats.type_summary.get("video"), Some(&1));
    assert_eq!(stats.vad_summary.avg_valence, Some(0.5));
    assert_eq!(stats.vad_summary.avg_arousal, Some(0.5));
    assert_eq!(stats.vad_summary.std_valence, Some(0.71));
    assert_eq!(stats.vad_summary.std_arousal, Some(0.0));
}

pub async fn history_records_updates_and_resets(store: &dyn MediaStore) {
    let item = store.create(&new_item("hist.png")).await.unwrap();
    store
        .update_annotation(item.id, &patch(Some("angry"), None, None))
        .await
        .unwrap();
    store
        .update_annotation(item.id, &patch(None, Some(-0.2), Some(0.9)))
        .await
        .unwrap();
    store.reset_all().await.unwrap();

    let history = store.history(item.id).await.unwrap();
    let actions: Vec<&str> = history.iter().map(|h| h.action.as_str()).collect();
    assert_eq!(actions, vec!["reset", "update", "update"]);

    let reset = &history[0];
    assert_eq!(reset.previous_values.emotion, Some(Emotion::Angry));
    assert_eq!(reset.previous_values.valence, Some(-0.2));
    assert!(reset.new_values.is_empty());

    let first = &history[2];
    assert!(first.previous_values.is_empty());
    assert_eq!(first.new_values.emotion, Some(Emotion::Angry));
}
