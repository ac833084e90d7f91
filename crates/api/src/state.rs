use std::sync::Arc;

use navmgr_core::provider::DefaultLinkProvider;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: navmgr_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Source of the default navigation tree.
    pub links: Arc<dyn DefaultLinkProvider>,
}
