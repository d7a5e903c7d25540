use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: labdesk_db::DbPool,
    /// Server configuration (JWT secret, media root, upload ceiling).
    pub config: Arc<ServerConfig>,
}
