pub mod nav_manager;
pub mod navigation;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /navigation                          reconciled links (public)
///
/// /nav-manager/links                   list, save (manage_navlinks)
/// /nav-manager/links/{id}              edit view
/// /nav-manager/links/{id}/restore      restore default (POST)
/// /nav-manager/import                  import defaults (GET, POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/navigation", navigation::router())
        .nest("/nav-manager", nav_manager::router())
}

/// `GET /health`, mounted at the root rather than under `/api/v1`.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database does not answer.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match navmgr_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Health check could not reach the database");
            false
        }
    };

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}
