//! Route definitions for the navigation manager admin tool.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::nav_manager;
use crate::state::AppState;

/// Admin routes mounted at `/nav-manager`.
///
/// ```text
/// GET  /links               -> list_links
/// POST /links               -> save_link
/// GET  /links/{id}          -> get_link
/// POST /links/{id}/restore  -> restore_link
/// GET  /import              -> import_links
/// POST /import              -> import_links
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/links",
            get(nav_manager::list_links).post(nav_manager::save_link),
        )
        .route("/links/{id}", get(nav_manager::get_link))
        .route("/links/{id}/restore", post(nav_manager::restore_link))
        .route(
            "/import",
            get(nav_manager::import_links).post(nav_manager::import_links),
        )
}
