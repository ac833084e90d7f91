//! Navigation-build endpoint consumed by page rendering.

use axum::extract::{Query, State};
use axum::Json;
use navmgr_core::nav_link::{NavContext, Scope};
use navmgr_core::reconcile::NavBuild;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::MaybeAuthUser;
use crate::navigation::service;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for [`get_navigation`].
#[derive(Debug, Deserialize)]
pub struct NavigationQuery {
    /// Section key; absent for the top-level bar.
    pub parent: Option<String>,
    /// Page being rendered, used to flag the active link.
    pub location: Option<String>,
}

/// GET /api/v1/navigation?parent=&location=
///
/// Reconciled, ordered links for one scope. Public; the caller's abilities
/// only affect permission-gated default links.
pub async fn get_navigation(
    user: MaybeAuthUser,
    State(state): State<AppState>,
    Query(params): Query<NavigationQuery>,
) -> AppResult<Json<DataResponse<NavBuild>>> {
    let scope = Scope::from_parent_key(params.parent.as_deref().filter(|p| !p.is_empty()));
    let ctx = NavContext::new(
        params.location.as_deref(),
        &state.config.nav.front_page,
        user.abilities(),
    );

    let build =
        service::build_navigation(&state.pool, state.links.as_ref(), &scope, &ctx).await?;
    Ok(Json(DataResponse { data: build }))
}
