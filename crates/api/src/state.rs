use std::sync::Arc;

use spark_db::DbPool;

use crate::config::ServerConfig;
use crate::engine::JobEngine;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// In-memory database handle.
    pub pool: DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Listing enhancement job engine.
    pub engine: Arc<JobEngine>,
}
