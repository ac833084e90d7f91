//! Navigation link override models and DTOs.

use navmgr_core::nav_link::DefaultLink;
use navmgr_core::reconcile::LinkOverride;
use navmgr_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `nav_link_override` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NavLinkRecord {
    pub id: DbId,
    pub parent_id: Option<DbId>,
    pub description: String,
    pub url: String,
    pub sort_order: i32,
    /// Mirrors a default link rather than being created by an administrator.
    pub is_default: bool,
    pub key: Option<String>,
    pub parent_key: Option<String>,
    pub enabled: bool,
    /// Set once an administrator edit has diverged the row from its default.
    pub modified: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A modified row joined with the key of the row `parent_id` points at.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ModifiedNavLink {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub link: NavLinkRecord,
    pub current_parent: Option<String>,
}

impl From<ModifiedNavLink> for LinkOverride {
    fn from(row: ModifiedNavLink) -> Self {
        let ModifiedNavLink {
            link,
            current_parent,
        } = row;
        LinkOverride {
            id: link.id,
            key: link.key,
            parent_key: link.parent_key,
            current_parent,
            url: link.url,
            description: link.description,
            sort_order: link.sort_order,
            enabled: link.enabled,
        }
    }
}

/// One row of the admin table: the link plus its parent's description.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NavLinkListRow {
    pub id: DbId,
    pub description: String,
    pub parent_description: Option<String>,
    pub url: String,
    pub sort_order: i32,
    pub enabled: bool,
    pub modified: bool,
}

/// A candidate parent offered by the edit form.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ParentOption {
    pub id: DbId,
    pub description: String,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// DTO for inserting a row.
#[derive(Debug, Clone)]
pub struct CreateNavLink {
    pub parent_id: Option<DbId>,
    pub description: String,
    pub url: String,
    pub sort_order: i32,
    pub is_default: bool,
    pub key: Option<String>,
    pub parent_key: Option<String>,
    pub enabled: bool,
    pub modified: bool,
}

impl CreateNavLink {
    /// An unmodified, enabled mirror of a default link.
    pub fn from_default(link: &DefaultLink, parent_id: Option<DbId>) -> Self {
        Self {
            parent_id,
            description: link.label.clone(),
            url: link.target.clone(),
            sort_order: link.order,
            is_default: true,
            key: Some(link.key.clone()),
            parent_key: link.parent_key.clone(),
            enabled: true,
            modified: false,
        }
    }
}

/// DTO replacing the editable columns of a row. Every field is written.
#[derive(Debug, Clone)]
pub struct UpdateNavLink {
    pub parent_id: Option<DbId>,
    pub description: String,
    pub url: String,
    pub sort_order: i32,
    pub enabled: bool,
    pub modified: bool,
}

impl UpdateNavLink {
    /// Values that put a row back to its current default.
    pub fn restore_from(link: &DefaultLink, parent_id: Option<DbId>) -> Self {
        Self {
            parent_id,
            description: link.label.clone(),
            url: link.target.clone(),
            sort_order: link.order,
            enabled: true,
            modified: false,
        }
    }
}

/// Outcome of [`crate::repositories::NavLinkRepo::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(DbId),
    /// A default row with the same `(key, parent_key)` was already stored.
    Existing(DbId),
}

impl InsertOutcome {
    pub fn id(self) -> DbId {
        match self {
            InsertOutcome::Inserted(id) | InsertOutcome::Existing(id) => id,
        }
    }

    pub fn was_inserted(self) -> bool {
        matches!(self, InsertOutcome::Inserted(_))
    }
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Payload of the admin save form. An absent `id` creates a new link.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveNavLink {
    pub id: Option<DbId>,
    pub parent_id: Option<DbId>,
    pub description: String,
    pub url: String,
    pub sort_order: Option<i32>,
    /// Unchecked checkboxes are not submitted, so absence means disabled.
    #[serde(default)]
    pub enabled: bool,
}

/// Filters accepted by the admin table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NavLinkFilter {
    pub enabled: Option<bool>,
    pub modified: Option<bool>,
    /// Case-insensitive substring of the description.
    pub description: Option<String>,
}
