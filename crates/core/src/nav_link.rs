//! Navigation links as contributed by application code, plus the request
//! context they are built against.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::permissions::Abilities;
use crate::types::DbId;

/// Sort priority given to links that do not specify one.
pub const DEFAULT_ORDER: i32 = 50;

/// Maximum length of a link key or parent key (`VARCHAR(128)` in the store).
pub const MAX_KEY_LEN: usize = 128;

/// Prefix of the key synthesized for user-created links that carry no key.
const SYNTHESIZED_KEY_PREFIX: &str = "nav_manager-";

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// Where a group of links lives: the top-level bar or a named section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "key")]
pub enum Scope {
    TopLevel,
    Section(String),
}

impl Scope {
    /// Build a scope from a nullable parent key.
    pub fn from_parent_key(parent_key: Option<&str>) -> Self {
        match parent_key {
            Some(key) => Scope::Section(key.to_string()),
            None => Scope::TopLevel,
        }
    }

    /// The parent key links in this scope carry (`None` at top level).
    pub fn parent_key(&self) -> Option<&str> {
        match self {
            Scope::TopLevel => None,
            Scope::Section(key) => Some(key),
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::TopLevel => f.write_str("<top>"),
            Scope::Section(key) => f.write_str(key),
        }
    }
}

// ---------------------------------------------------------------------------
// Request context
// ---------------------------------------------------------------------------

/// Per-request inputs used when building default links.
#[derive(Debug, Clone)]
pub struct NavContext {
    /// Page being viewed, without leading slash. Falls back to the front page.
    pub location: String,
    pub abilities: Abilities,
    /// Set by import/restore so that permission-gated links are still listed.
    pub ignore_permissions: bool,
}

impl NavContext {
    pub fn new(location: Option<&str>, front_page: &str, abilities: Abilities) -> Self {
        let location = location
            .map(page_of)
            .filter(|page| !page.is_empty())
            .unwrap_or_else(|| page_of(front_page));
        Self {
            location,
            abilities,
            ignore_permissions: false,
        }
    }

    /// Context for internal callers that need the complete default tree.
    pub fn ignoring_permissions(front_page: &str) -> Self {
        let mut ctx = Self::new(None, front_page, Abilities::none());
        ctx.ignore_permissions = true;
        ctx
    }

    pub fn can(&self, ability: &str) -> bool {
        self.ignore_permissions || self.abilities.can(ability)
    }

    /// True iff the current location is `target`, or starts with one of `matches`.
    pub fn is_active(&self, target: &str, matches: &[String]) -> bool {
        self.location == page_of(target)
            || matches
                .iter()
                .any(|prefix| self.location.starts_with(page_of(prefix).as_str()))
    }
}

// ---------------------------------------------------------------------------
// DefaultLink
// ---------------------------------------------------------------------------

/// A navigation entry produced for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefaultLink {
    pub target: String,
    pub label: String,
    pub key: String,
    pub order: i32,
    pub parent_key: Option<String>,
    pub active: bool,
}

impl DefaultLink {
    pub fn new(
        target: impl Into<String>,
        label: impl Into<String>,
        key: impl Into<String>,
        order: i32,
        parent_key: Option<String>,
        matches: &[String],
        ctx: &NavContext,
    ) -> Self {
        let target = page_of(&target.into());
        let active = ctx.is_active(&target, matches);
        Self {
            target,
            label: label.into(),
            key: key.into(),
            order,
            parent_key,
            active,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Strip surrounding whitespace and leading slashes from a page locator.
pub fn page_of(url: &str) -> String {
    url.trim().trim_start_matches('/').to_string()
}

/// Key given to a user-created link that was saved without one.
pub fn synthesized_key(id: DbId) -> String {
    format!("{SYNTHESIZED_KEY_PREFIX}{id}")
}

/// Reject blank descriptions and URLs submitted through the admin form.
pub fn validate_link_fields(description: &str, url: &str) -> Result<(), CoreError> {
    if description.trim().is_empty() {
        return Err(CoreError::Validation("description must not be empty".into()));
    }
    if page_of(url).is_empty() && url.trim() != "/" {
        return Err(CoreError::Validation("url must not be empty".into()));
    }
    Ok(())
}

/// Reject keys that cannot be stored.
pub fn validate_key(key: &str) -> Result<(), CoreError> {
    if key.is_empty() {
        return Err(CoreError::Validation("link key must not be empty".into()));
    }
    if key.len() > MAX_KEY_LEN {
        return Err(CoreError::Validation(format!(
            "link key '{key}' exceeds {MAX_KEY_LEN} characters"
        )));
    }
    Ok(())
}
