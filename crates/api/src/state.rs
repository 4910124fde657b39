use std::sync::Arc;

use crate::config::ServerConfig;
use crate::stager::AssetStager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: propstack_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Asset staging area for uploaded files.
    pub stager: Arc<AssetStager>,
}
