//! Shared helpers for HTTP-level integration tests.
//!
//! Tests drive the real router (same middleware stack as `main.rs`) backed by
//! an in-memory store and a throwaway upload folder.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use markup_api::config::{ServerConfig, StoreBackend};
use markup_api::router::build_app_router;
use markup_api::state::AppState;
use markup_core::annotation::{AnnotationPatch, AnnotationStatus};
use markup_core::stats::MediaStats;
use markup_core::types::DbId;
use markup_db::models::history::AnnotationHistoryEntry;
use markup_db::models::media::{CreateMediaItem, MediaItem};
use markup_db::{MediaStore, MemoryMediaStore, StoreError};

/// A router plus handles to what it runs on.
///
/// Keep the value alive for the whole test: dropping it removes the upload
/// folder.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn MediaStore>,
    pub upload_dir: TempDir,
}

impl TestApp {
    /// A fresh clone of the router for one `oneshot` request.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn upload_path(&self) -> &Path {
        self.upload_dir.path()
    }
}

/// Build a test `ServerConfig` with safe defaults pointing at `upload_dir`.
pub fn test_config(upload_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        upload_dir: upload_dir.to_path_buf(),
        max_upload_bytes: 10 * 1024 * 1024,
        store_backend: StoreBackend::Memory,
    }
}

/// Build the full application router over an empty in-memory store.
pub fn build_test_app() -> TestApp {
    build_test_app_with_store(Arc::new(MemoryMediaStore::new()))
}

/// Build the full application router over the given store.
pub fn build_test_app_with_store(store: Arc<dyn MediaStore>) -> TestApp {
    let upload_dir = tempfile::tempdir().unwrap();
    let config = test_config(upload_dir.path());

    let state = AppState {
        store: Arc::clone(&store),
        config: Arc::new(config.clone()),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        upload_dir,
    }
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

/// An in-memory store whose `create` always fails with a database error.
#[derive(Default)]
pub struct FailingCreateStore {
    inner: MemoryMediaStore,
}

#[async_trait]
impl MediaStore for FailingCreateStore {
    async fn create(&self, _input: &CreateMediaItem) -> Result<MediaItem, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<MediaItem>, StoreError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_filename(&self, filename: &str) -> Result<Option<MediaItem>, StoreError> {
        self.inner.find_by_filename(filename).await
    }

    async fn update_annotation(
        &self,
        id: DbId,
        patch: &AnnotationPatch,
    ) -> Result<Option<MediaItem>, StoreError> {
        self.inner.update_annotation(id, patch).await
    }

    async fn list_all(&self) -> Result<Vec<MediaItem>, StoreError> {
        self.inner.list_all().await
    }

    async fn list_by_status(
        &self,
        status: AnnotationStatus,
    ) -> Result<Vec<MediaItem>, StoreError> {
        self.inner.list_by_status(status).await
    }

    async fn count(&self) -> Result<i64, StoreError> {
        self.inner.count().await
    }

    async fn reset_all(&self) -> Result<u64, StoreError> {
        self.inner.reset_all().await
    }

    async fn next_unannotated(&self, current_id: DbId) -> Result<Option<MediaItem>, StoreError> {
        self.inner.next_unannotated(current_id).await
    }

    async fn previous(&self, current_id: DbId) -> Result<Option<MediaItem>, StoreError> {
        self.inner.previous(current_id).await
    }

    async fn stats(&self) -> Result<MediaStats, StoreError> {
        self.inner.stats().await
    }

    async fn history(&self, media_id: DbId) -> Result<Vec<AnnotationHistoryEntry>, StoreError> {
        self.inner.history(media_id).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.inner.health_check().await
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a multipart form with a single `file` field.
pub async fn post_file(app: Router, uri: &str, filename: &str, data: &[u8]) -> Response<Body> {
    let boundary = "markup-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Upload `count` images named `sample{i}.jpg` and return their ids.
pub async fn seed_media(app: &TestApp, count: usize) -> Vec<i64> {
    let mut ids = Vec::with_capacity(count);
    for i in 1..=count {
        let response = post_file(app.app(), "/api/media/upload", &format!("sample{i}.jpg"), b"jpg").await;
        let json = body_json(response).await;
        ids.push(json["id"].as_i64().unwrap());
    }
    ids
}
