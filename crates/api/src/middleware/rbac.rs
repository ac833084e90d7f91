//! Ability-based access control extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use navmgr_core::permissions::MANAGE_NAVLINKS;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `manage_navlinks` ability.
///
/// Callers without it (including anonymous ones) get [`AppError::FeatureHidden`],
/// a plain 404, so the navigation manager does not reveal itself.
///
/// ```ignore
/// async fn admin_only(RequireNavManager(user): RequireNavManager) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireNavManager(pub AuthUser);

impl FromRequestParts<AppState> for RequireNavManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::FeatureHidden)?;
        if !user.abilities().can(MANAGE_NAVLINKS) {
            tracing::debug!(user_id = user.user_id, role = %user.role, "Nav manager hidden");
            return Err(AppError::FeatureHidden);
        }
        Ok(RequireNavManager(user))
    }
}
