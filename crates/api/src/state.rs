use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: rankqueue_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The consensus engine: sole mutator of queue items and the action log.
    pub engine: Arc<rankqueue_engine::ConsensusEngine>,
}
