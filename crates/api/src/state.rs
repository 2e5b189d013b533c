use std::sync::Arc;

use logoloco_eachlabs::ImageProvider;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: logoloco_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Image generation provider gateway.
    pub provider: Arc<dyn ImageProvider>,
}
