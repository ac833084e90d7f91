//! Route definitions for the navigation-build hook.

use axum::routing::get;
use axum::Router;

use crate::handlers::navigation;
use crate::state::AppState;

/// Public navigation route mounted at `/navigation`.
///
/// ```text
/// GET / -> get_navigation (?parent=&location=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(navigation::get_navigation))
}
