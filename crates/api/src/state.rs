use std::sync::Arc;

use markup_db::MediaStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Media store (PostgreSQL in production, in-memory in tests).
    pub store: Arc<dyn MediaStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
