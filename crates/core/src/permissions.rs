//! Role names, ability names, and the per-actor ability set.
//!
//! Abilities are derived from the role carried in the caller's access token.
//! Anonymous callers hold no abilities.

use std::collections::BTreeSet;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MODERATOR: &str = "moderator";
pub const ROLE_USER: &str = "user";

/// Move, rename, toggle, import and restore navigation links.
pub const MANAGE_NAVLINKS: &str = "manage_navlinks";

/// The set of abilities granted to the current actor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Abilities(BTreeSet<String>);

impl Abilities {
    /// No abilities at all (anonymous visitor).
    pub fn none() -> Self {
        Self::default()
    }

    /// Abilities implied by a role name. Unknown roles get nothing.
    pub fn for_role(role: &str) -> Self {
        let mut abilities = Self::none();
        if role == ROLE_ADMIN {
            abilities.grant(MANAGE_NAVLINKS);
        }
        abilities
    }

    pub fn grant(&mut self, ability: &str) {
        self.0.insert(ability.to_string());
    }

    pub fn can(&self, ability: &str) -> bool {
        self.0.contains(ability)
    }
}
