//! Handlers for the navigation manager admin tool.
//!
//! Every handler requires the `manage_navlinks` ability through
//! [`RequireNavManager`]; callers without it see a plain 404.

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use navmgr_core::error::CoreError;
use navmgr_core::pagination::{clamp_limit, clamp_offset, MAX_PAGE_SIZE};
use navmgr_core::types::DbId;
use navmgr_db::models::nav_link::{NavLinkFilter, NavLinkRecord, ParentOption, SaveNavLink};
use navmgr_db::repositories::NavLinkRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireNavManager;
use crate::navigation::service;
use crate::query::PaginationParams;
use crate::response::{ActionResponse, DataResponse, Page};
use crate::state::AppState;

/// Where callers are sent when the link they asked for does not exist.
pub const LIST_PATH: &str = "/api/v1/nav-manager/links";

/// Payload of the edit view.
#[derive(Debug, Serialize)]
pub struct EditView {
    pub link: NavLinkRecord,
    /// Top-level links the edited link may be moved under.
    pub parents: Vec<ParentOption>,
    /// Only imported links can be restored to a default.
    pub can_restore: bool,
}

/// GET /api/v1/nav-manager/links
///
/// Paginated admin table with optional `enabled`, `modified` and
/// `description` filters.
pub async fn list_links(
    RequireNavManager(_user): RequireNavManager,
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
    Query(filter): Query<NavLinkFilter>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(page.limit, state.config.nav.list_page_size, MAX_PAGE_SIZE);
    let offset = clamp_offset(page.offset);

    let items = NavLinkRepo::list_page(&state.pool, &filter, limit, offset).await?;
    let total_count = NavLinkRepo::count(&state.pool, &filter).await?;

    Ok(Json(DataResponse {
        data: Page {
            items,
            total_count,
            limit,
            offset,
        },
    }))
}

/// GET /api/v1/nav-manager/links/{id}
///
/// Single link plus the parent choices for the edit form. Unknown ids
/// redirect to the list.
pub async fn get_link(
    RequireNavManager(_user): RequireNavManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let Some(link) = NavLinkRepo::find_by_id(&state.pool, id).await? else {
        tracing::debug!(id, "Nav link not found, redirecting to list");
        return Ok(Redirect::to(LIST_PATH).into_response());
    };
    let parents = NavLinkRepo::list_parents(&state.pool, Some(id)).await?;
    let can_restore = link.is_default;

    Ok(Json(DataResponse {
        data: EditView {
            link,
            parents,
            can_restore,
        },
    })
    .into_response())
}

/// POST /api/v1/nav-manager/links
///
/// Save the edit form. With an `id` the link is updated, otherwise a new
/// link is created.
pub async fn save_link(
    RequireNavManager(user): RequireNavManager,
    State(state): State<AppState>,
    Json(input): Json<SaveNavLink>,
) -> AppResult<impl IntoResponse> {
    let link = service::save_link(&state.pool, &input).await?;

    tracing::info!(user_id = user.user_id, link_id = link.id, "Nav link saved");

    Ok(Json(ActionResponse {
        message: "Link saved.",
        data: link,
    }))
}

/// POST /api/v1/nav-manager/links/{id}/restore
///
/// Reset a link to its current default. Redirects to the list when the link
/// or its default no longer exists.
pub async fn restore_link(
    RequireNavManager(user): RequireNavManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let result = service::restore_link(
        &state.pool,
        state.links.as_ref(),
        &state.config.nav.front_page,
        id,
    )
    .await;

    match result {
        Ok(link) => {
            tracing::info!(user_id = user.user_id, link_id = link.id, "Nav link restore requested");
            Ok(Json(ActionResponse {
                message: "Link restored.",
                data: link,
            })
            .into_response())
        }
        Err(AppError::Core(CoreError::NotFound { .. })) => {
            Ok(Redirect::to(LIST_PATH).into_response())
        }
        Err(err) => Err(err),
    }
}

/// GET|POST /api/v1/nav-manager/import
///
/// Import every default link not yet stored.
pub async fn import_links(
    RequireNavManager(user): RequireNavManager,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let summary = service::import_all(
        &state.pool,
        state.links.as_ref(),
        &state.config.nav.front_page,
    )
    .await?;

    tracing::info!(
        user_id = user.user_id,
        inserted = summary.inserted,
        "Nav link import requested",
    );

    Ok(Json(ActionResponse {
        message: "Default navigation links imported.",
        data: summary,
    }))
}
