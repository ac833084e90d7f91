//! Operations combining the default link provider with the override store.

use navmgr_core::error::CoreError;
use navmgr_core::nav_link::{page_of, validate_link_fields, NavContext, Scope};
use navmgr_core::provider::DefaultLinkProvider;
use navmgr_core::reconcile::{reconcile, NavBuild};
use navmgr_core::types::DbId;
use navmgr_db::models::nav_link::{
    CreateNavLink, InsertOutcome, NavLinkRecord, SaveNavLink, UpdateNavLink,
};
use navmgr_db::repositories::NavLinkRepo;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

const ENTITY: &str = "NavLink";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY, id })
}

// ---------------------------------------------------------------------------
// Read side
// ---------------------------------------------------------------------------

/// Final navigation for `scope`: the provider's defaults with stored
/// overrides applied.
pub async fn build_navigation(
    pool: &PgPool,
    provider: &dyn DefaultLinkProvider,
    scope: &Scope,
    ctx: &NavContext,
) -> Result<NavBuild, sqlx::Error> {
    let defaults = NavBuild::new(provider.links_for(scope, ctx));
    let overrides = NavLinkRepo::list_modified(pool, scope).await?;
    let override_count = overrides.len();

    let build = reconcile(scope, defaults, overrides, ctx);
    tracing::debug!(
        %scope,
        overrides = override_count,
        links = build.links.len(),
        "Navigation built",
    );
    Ok(build)
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Counts reported by [`import_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub inserted: usize,
    pub existing: usize,
}

impl ImportSummary {
    fn record(&mut self, outcome: InsertOutcome) {
        if outcome.was_inserted() {
            self.inserted += 1;
        } else {
            self.existing += 1;
        }
    }
}

/// Mirror every default link into the store: top-level links, then each one's
/// section links parented to it. Rows that already exist are left alone, so
/// running this again is harmless.
pub async fn import_all(
    pool: &PgPool,
    provider: &dyn DefaultLinkProvider,
    front_page: &str,
) -> Result<ImportSummary, sqlx::Error> {
    let ctx = NavContext::ignoring_permissions(front_page);
    let mut summary = ImportSummary::default();

    for link in provider.top_level(&ctx) {
        let outcome = NavLinkRepo::insert(pool, &CreateNavLink::from_default(&link, None)).await?;
        summary.record(outcome);
        let parent_id = outcome.id();

        for sublink in provider.section(&link.key, &ctx) {
            let outcome =
                NavLinkRepo::insert(pool, &CreateNavLink::from_default(&sublink, Some(parent_id)))
                    .await?;
            summary.record(outcome);
        }
    }

    tracing::info!(
        inserted = summary.inserted,
        existing = summary.existing,
        "Default navigation links imported",
    );
    Ok(summary)
}

// ---------------------------------------------------------------------------
// Restore
// ---------------------------------------------------------------------------

/// Reset a row to the current value of its default link.
///
/// Fails with NotFound, leaving the row untouched, when the row is missing,
/// has no key, or its key is no longer among the defaults of its scope.
pub async fn restore_link(
    pool: &PgPool,
    provider: &dyn DefaultLinkProvider,
    front_page: &str,
    id: DbId,
) -> AppResult<NavLinkRecord> {
    let record = NavLinkRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let key = record.key.as_deref().ok_or_else(|| not_found(id))?;

    let scope = Scope::from_parent_key(record.parent_key.as_deref());
    let ctx = NavContext::ignoring_permissions(front_page);
    let link = provider
        .links_for(&scope, &ctx)
        .into_iter()
        .find(|link| link.key == key)
        .ok_or_else(|| {
            tracing::info!(id, key, %scope, "Default link no longer exists, cannot restore");
            not_found(id)
        })?;

    let parent_id = match link.parent_key.as_deref() {
        Some(parent_key) => NavLinkRepo::find_default(pool, parent_key, None)
            .await?
            .map(|parent| parent.id),
        None => None,
    };

    let restored = NavLinkRepo::update(pool, id, &UpdateNavLink::restore_from(&link, parent_id))
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(id, key = %link.key, "Nav link restored to default");
    Ok(restored)
}

// ---------------------------------------------------------------------------
// Save
// ---------------------------------------------------------------------------

/// Apply an administrator edit: update the row named by `input.id`, or create
/// a new user-owned link when no id is given. The row is always marked
/// modified.
pub async fn save_link(pool: &PgPool, input: &SaveNavLink) -> AppResult<NavLinkRecord> {
    validate_link_fields(&input.description, &input.url)?;
    if input.id.is_some() && input.parent_id == input.id {
        return Err(AppError::Core(CoreError::Validation(
            "a link cannot be its own parent".into(),
        )));
    }

    let description = input.description.trim().to_string();
    let url = page_of(&input.url);
    let sort_order = input.sort_order.unwrap_or(0);

    match input.id {
        Some(id) => {
            let update = UpdateNavLink {
                parent_id: input.parent_id,
                description,
                url,
                sort_order,
                enabled: input.enabled,
                modified: true,
            };
            let record = NavLinkRepo::update(pool, id, &update)
                .await?
                .ok_or_else(|| not_found(id))?;
            tracing::info!(id, enabled = record.enabled, "Nav link updated");
            Ok(record)
        }
        None => {
            let create = CreateNavLink {
                parent_id: input.parent_id,
                description,
                url,
                sort_order,
                is_default: false,
                key: None,
                parent_key: None,
                enabled: input.enabled,
                modified: true,
            };
            let id = NavLinkRepo::insert(pool, &create).await?.id();
            let record = NavLinkRepo::find_by_id(pool, id).await?.ok_or_else(|| {
                AppError::InternalError(format!("nav link {id} vanished after insert"))
            })?;
            tracing::info!(id, "Nav link created");
            Ok(record)
        }
    }
}
