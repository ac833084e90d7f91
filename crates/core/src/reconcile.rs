//! Merge of persisted link overrides onto the default navigation tree.

use indexmap::IndexMap;
use serde::Serialize;

use crate::nav_link::{synthesized_key, DefaultLink, NavContext, Scope};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Override input
// ---------------------------------------------------------------------------

/// A modified link row as seen by the merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOverride {
    pub id: DbId,
    pub key: Option<String>,
    /// Scope the row was imported under.
    pub parent_key: Option<String>,
    /// Key of the row `parent_id` currently points at.
    pub current_parent: Option<String>,
    pub url: String,
    pub description: String,
    pub sort_order: i32,
    pub enabled: bool,
}

impl LinkOverride {
    /// The row's key, or a synthesized one for keyless user-created rows.
    pub fn link_key(&self) -> String {
        self.key.clone().unwrap_or_else(|| synthesized_key(self.id))
    }

    /// Enabled and currently parented under `scope`.
    pub fn shown_in(&self, scope: &Scope) -> bool {
        self.enabled && self.current_parent.as_deref() == scope.parent_key()
    }
}

/// Modified rows grouped by stored parent key, then by link key.
///
/// Both levels keep insertion order so that appended links come out in the
/// order the store returned them.
#[derive(Debug, Clone, Default)]
pub struct ModifiedLinks {
    groups: IndexMap<Option<String>, IndexMap<String, LinkOverride>>,
}

impl ModifiedLinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, link: LinkOverride) {
        let key = link.link_key();
        self.groups
            .entry(link.parent_key.clone())
            .or_default()
            .insert(key, link);
    }

    pub fn get(&self, parent_key: Option<&str>, key: &str) -> Option<&LinkOverride> {
        self.groups
            .get(&parent_key.map(str::to_string))
            .and_then(|group| group.get(key))
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove the entry for `key` in the group of `scope`, preserving the
    /// order of what remains.
    fn take(&mut self, scope: &Scope, key: &str) -> Option<LinkOverride> {
        self.groups
            .get_mut(&scope.parent_key().map(str::to_string))
            .and_then(|group| group.shift_remove(key))
    }

    fn into_remaining(self) -> impl Iterator<Item = LinkOverride> {
        self.groups.into_values().flat_map(IndexMap::into_values)
    }
}

impl FromIterator<LinkOverride> for ModifiedLinks {
    fn from_iter<I: IntoIterator<Item = LinkOverride>>(iter: I) -> Self {
        let mut links = Self::new();
        for link in iter {
            links.insert(link);
        }
        links
    }
}

// ---------------------------------------------------------------------------
// NavBuild
// ---------------------------------------------------------------------------

/// An ordered list of links for one scope, plus which of them is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavBuild {
    pub links: Vec<DefaultLink>,
    pub active_key: Option<String>,
}

impl NavBuild {
    /// The first link flagged active becomes the active link.
    pub fn new(links: Vec<DefaultLink>) -> Self {
        let active_key = links.iter().find(|l| l.active).map(|l| l.key.clone());
        Self { links, active_key }
    }
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Apply `overrides` to the default links of `scope`.
///
/// Defaults keep their order. An override that is disabled, or whose row now
/// hangs under a different parent, suppresses its default; otherwise it
/// replaces target, label and order. Remaining overrides shown in `scope`
/// are appended afterwards; the first active one becomes the active link if
/// none is set yet. Nothing is re-sorted.
pub fn reconcile(
    scope: &Scope,
    defaults: NavBuild,
    mut overrides: ModifiedLinks,
    ctx: &NavContext,
) -> NavBuild {
    let NavBuild {
        links: defaults,
        mut active_key,
    } = defaults;
    let mut links = Vec::with_capacity(defaults.len());

    for mut link in defaults {
        if let Some(row) = overrides.take(scope, &link.key) {
            if !row.shown_in(scope) {
                if active_key.as_deref() == Some(link.key.as_str()) {
                    active_key = None;
                }
                continue;
            }
            link.target = row.url;
            link.label = row.description;
            link.order = row.sort_order;
        }
        links.push(link);
    }

    for row in overrides.into_remaining() {
        if !row.shown_in(scope) {
            continue;
        }
        let key = row.link_key();
        let link = DefaultLink::new(
            row.url,
            row.description,
            key,
            row.sort_order,
            scope.parent_key().map(str::to_string),
            &[],
            ctx,
        );
        if active_key.is_none() && link.active {
            active_key = Some(link.key.clone());
        }
        links.push(link);
    }

    NavBuild { links, active_key }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::Abilities;

    fn ctx() -> NavContext {
        NavContext::new(Some("b"), "a", Abilities::none())
    }

    fn link(key: &str, order: i32, parent: Option<&str>) -> DefaultLink {
        let parent = parent.map(str::to_string);
        DefaultLink::new(key, key.to_uppercase(), key, order, parent, &[], &ctx())
    }

    fn defaults() -> NavBuild {
        NavBuild::new(vec![link("a", 10, None), link("b", 20, None)])
    }

    fn row(
        id: DbId,
        key: Option<&str>,
        parent_key: Option<&str>,
        current_parent: Option<&str>,
    ) -> LinkOverride {
        LinkOverride {
            id,
            key: key.map(str::to_string),
            parent_key: parent_key.map(str::to_string),
            current_parent: current_parent.map(str::to_string),
            url: format!("custom/{id}"),
            description: format!("Custom {id}"),
            sort_order: 5,
            enabled: true,
        }
    }

    fn keys(build: &NavBuild) -> Vec<&str> {
        build.links.iter().map(|l| l.key.as_str()).collect()
    }

    #[test]
    fn no_overrides_returns_defaults_unchanged() {
        let out = reconcile(&Scope::TopLevel, defaults(), ModifiedLinks::new(), &ctx());
        assert_eq!(out, defaults());
    }

    #[test]
    fn disabled_override_drops_link() {
        let mut disabled = row(1, Some("a"), None, None);
        disabled.enabled = false;

        let out = reconcile(&Scope::TopLevel, defaults(), [disabled].into_iter().collect(), &ctx());

        assert_eq!(keys(&out), vec!["b"]);
        assert_eq!(out.links[0].target, "b");
    }

    #[test]
    fn dropping_active_link_clears_active_key() {
        let mut disabled = row(1, Some("b"), None, None);
        disabled.enabled = false;
        assert_eq!(defaults().active_key.as_deref(), Some("b"));

        let out = reconcile(&Scope::TopLevel, defaults(), [disabled].into_iter().collect(), &ctx());

        assert_eq!(keys(&out), vec!["a"]);
        assert_eq!(out.active_key, None);
    }

    #[test]
    fn moved_override_is_excluded_from_original_scope() {
        let moved = row(1, Some("a"), None, Some("system"));

        let out = reconcile(&Scope::TopLevel, defaults(), [moved].into_iter().collect(), &ctx());

        assert_eq!(keys(&out), vec!["b"]);
    }

    #[test]
    fn enabled_override_replaces_target_label_and_order() {
        let out = reconcile(
            &Scope::TopLevel,
            defaults(),
            [row(7, Some("a"), None, None)].into_iter().collect(),
            &ctx(),
        );

        assert_eq!(keys(&out), vec!["a", "b"]);
        assert_eq!(out.links[0].target, "custom/7");
        assert_eq!(out.links[0].label, "Custom 7");
        assert_eq!(out.links[0].order, 5);
    }

    #[test]
    fn new_override_is_appended_once() {
        let out = reconcile(
            &Scope::TopLevel,
            defaults(),
            [row(3, Some("c"), None, None)].into_iter().collect(),
            &ctx(),
        );

        assert_eq!(keys(&out), vec!["a", "b", "c"]);
        assert_eq!(out.links[2].target, "custom/3");
    }

    #[test]
    fn appended_links_are_not_resorted() {
        // Order 5 would sort first; the merge keeps defaults-then-extras.
        let out = reconcile(
            &Scope::TopLevel,
            defaults(),
            [row(3, Some("c"), None, None)].into_iter().collect(),
            &ctx(),
        );

        assert_eq!(out.links[2].order, 5);
        assert!(out.links[0].order > out.links[2].order);
    }

    #[test]
    fn keyless_override_gets_synthesized_key() {
        let out = reconcile(
            &Scope::TopLevel,
            defaults(),
            [row(42, None, None, None)].into_iter().collect(),
            &ctx(),
        );

        assert_eq!(keys(&out), vec!["a", "b", "nav_manager-42"]);
    }

    #[test]
    fn link_moved_into_scope_is_appended_there() {
        // Imported under "system", since re-parented to top level.
        let moved = row(9, Some("ext"), Some("system"), None);

        let overrides = [moved.clone()].into_iter().collect();
        let top = reconcile(&Scope::TopLevel, defaults(), overrides, &ctx());
        assert_eq!(keys(&top), vec!["a", "b", "ext"]);

        let system = Scope::Section("system".into());
        let section_defaults = NavBuild::new(vec![link("ext", 10, Some("system"))]);
        let out = reconcile(&system, section_defaults, [moved].into_iter().collect(), &ctx());
        assert!(out.links.is_empty());
    }

    #[test]
    fn section_override_applies_within_section() {
        let system = Scope::Section("system".into());
        let section_defaults = NavBuild::new(vec![
            link("ext", 10, Some("system")),
            link("logs", 20, Some("system")),
        ]);
        let renamed = row(4, Some("logs"), Some("system"), Some("system"));

        let out = reconcile(&system, section_defaults, [renamed].into_iter().collect(), &ctx());

        assert_eq!(keys(&out), vec!["ext", "logs"]);
        assert_eq!(out.links[1].label, "Custom 4");
        assert_eq!(out.links[1].parent_key.as_deref(), Some("system"));
    }

    #[test]
    fn disabled_new_override_is_not_appended() {
        let mut extra = row(3, Some("c"), None, None);
        extra.enabled = false;

        let out = reconcile(&Scope::TopLevel, defaults(), [extra].into_iter().collect(), &ctx());

        assert_eq!(keys(&out), vec!["a", "b"]);
    }

    #[test]
    fn modified_links_groups_by_parent_key() {
        let links: ModifiedLinks = [
            row(1, Some("a"), None, None),
            row(2, Some("x"), Some("system"), Some("system")),
        ]
        .into_iter()
        .collect();

        assert_eq!(links.len(), 2);
        assert!(links.get(None, "a").is_some());
        assert!(links.get(Some("system"), "x").is_some());
        assert!(links.get(None, "x").is_none());
    }

    #[test]
    fn active_appended_link_becomes_active_key() {
        let ctx = NavContext::new(Some("wiki"), "a", Abilities::none());
        let defaults = NavBuild::new(vec![DefaultLink::new("a", "A", "a", 10, None, &[], &ctx)]);
        let mut extra = row(1, None, None, None);
        extra.url = "wiki".into();

        let out = reconcile(&Scope::TopLevel, defaults, [extra].into_iter().collect(), &ctx);

        assert!(!out.links[0].active);
        assert!(out.links[1].active);
        assert_eq!(out.active_key.as_deref(), Some("nav_manager-1"));
    }

    #[test]
    fn appended_link_does_not_steal_existing_active_key() {
        let mut extra = row(3, Some("c"), None, None);
        extra.url = "b".into();

        let out = reconcile(&Scope::TopLevel, defaults(), [extra].into_iter().collect(), &ctx());

        assert!(out.links[2].active);
        assert_eq!(out.active_key.as_deref(), Some("b"));
    }
}
