//! Sources of default navigation links.
//!
//! [`DefaultLinkProvider`] is the seam application code plugs into. The
//! [`StaticLinkProvider`] serves a fixed tree, typically loaded from a JSON
//! file at startup:
//!
//! ```json
//! {
//!   "links": [
//!     {
//!       "key": "posts", "target": "post/list", "label": "Posts",
//!       "order": 10, "matches": ["post/"]
//!     }
//!   ],
//!   "sections": {
//!     "posts": [
//!       { "key": "posts_all", "target": "post/list", "label": "All" }
//!     ]
//!   }
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::CoreError;
use crate::nav_link::{validate_key, DefaultLink, NavContext, Scope, DEFAULT_ORDER};

/// Produces the default navigation tree for a request.
///
/// Implementations must return links sorted by `order`, keeping their
/// declaration order among equal orders.
pub trait DefaultLinkProvider: Send + Sync {
    fn top_level(&self, ctx: &NavContext) -> Vec<DefaultLink>;

    fn section(&self, section_key: &str, ctx: &NavContext) -> Vec<DefaultLink>;

    fn links_for(&self, scope: &Scope, ctx: &NavContext) -> Vec<DefaultLink> {
        match scope {
            Scope::TopLevel => self.top_level(ctx),
            Scope::Section(key) => self.section(key, ctx),
        }
    }
}

/// Declarative description of one default link.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkSpec {
    pub key: String,
    pub target: String,
    pub label: String,
    #[serde(default = "default_order")]
    pub order: i32,
    /// Location prefixes that also mark the link active.
    #[serde(default)]
    pub matches: Vec<String>,
    /// Ability the viewer must hold for the link to be listed.
    #[serde(default)]
    pub requires: Option<String>,
}

fn default_order() -> i32 {
    DEFAULT_ORDER
}

impl LinkSpec {
    pub fn new(key: &str, target: &str, label: &str, order: i32) -> Self {
        Self {
            key: key.to_string(),
            target: target.to_string(),
            label: label.to_string(),
            order,
            matches: Vec::new(),
            requires: None,
        }
    }

    pub fn with_matches(mut self, matches: &[&str]) -> Self {
        self.matches = matches.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn requiring(mut self, ability: &str) -> Self {
        self.requires = Some(ability.to_string());
        self
    }

    fn visible_to(&self, ctx: &NavContext) -> bool {
        self.requires.as_deref().map_or(true, |ability| ctx.can(ability))
    }

    pub fn build(&self, parent_key: Option<&str>, ctx: &NavContext) -> DefaultLink {
        DefaultLink::new(
            &self.target,
            &self.label,
            &self.key,
            self.order,
            parent_key.map(str::to_string),
            &self.matches,
            ctx,
        )
    }
}

/// A fixed navigation tree: top-level links plus one level of sections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaticLinkProvider {
    #[serde(default)]
    links: Vec<LinkSpec>,
    #[serde(default)]
    sections: IndexMap<String, Vec<LinkSpec>>,
}

impl StaticLinkProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_link(mut self, spec: LinkSpec) -> Self {
        self.links.push(spec);
        self
    }

    pub fn with_section_link(mut self, section_key: &str, spec: LinkSpec) -> Self {
        self.sections
            .entry(section_key.to_string())
            .or_default()
            .push(spec);
        self
    }

    /// Parse a provider from its JSON representation and validate it.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let provider: Self = serde_json::from_str(json)
            .map_err(|e| CoreError::Validation(format!("invalid navigation link file: {e}")))?;
        provider.validate()?;
        Ok(provider)
    }

    /// Read and parse a JSON link file.
    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Internal(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Keys must be storable and unique within their scope.
    pub fn validate(&self) -> Result<(), CoreError> {
        check_scope("<top>", &self.links)?;
        for (section, specs) in &self.sections {
            validate_key(section)?;
            check_scope(section, specs)?;
        }
        Ok(())
    }

    fn render(specs: &[LinkSpec], parent_key: Option<&str>, ctx: &NavContext) -> Vec<DefaultLink> {
        let mut links: Vec<DefaultLink> = specs
            .iter()
            .filter(|spec| spec.visible_to(ctx))
            .map(|spec| spec.build(parent_key, ctx))
            .collect();
        // `sort_by_key` is stable, so declaration order breaks ties.
        links.sort_by_key(|link| link.order);
        links
    }
}

fn check_scope(scope: &str, specs: &[LinkSpec]) -> Result<(), CoreError> {
    let mut seen = HashSet::new();
    for spec in specs {
        validate_key(&spec.key)?;
        if !seen.insert(spec.key.as_str()) {
            return Err(CoreError::Validation(format!(
                "duplicate link key '{}' in scope {scope}",
                spec.key
            )));
        }
    }
    Ok(())
}

impl DefaultLinkProvider for StaticLinkProvider {
    fn top_level(&self, ctx: &NavContext) -> Vec<DefaultLink> {
        Self::render(&self.links, None, ctx)
    }

    fn section(&self, section_key: &str, ctx: &NavContext) -> Vec<DefaultLink> {
        self.sections
            .get(section_key)
            .map(|specs| Self::render(specs, Some(section_key), ctx))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::permissions::{Abilities, MANAGE_NAVLINKS};

    fn ctx() -> NavContext {
        NavContext::new(Some("post/list"), "post/list", Abilities::none())
    }

    fn keys(links: &[DefaultLink]) -> Vec<&str> {
        links.iter().map(|l| l.key.as_str()).collect()
    }

    #[test]
    fn top_level_is_sorted_by_order_with_stable_ties() {
        let provider = StaticLinkProvider::new()
            .with_link(LinkSpec::new("c", "c", "C", 30))
            .with_link(LinkSpec::new("a", "a", "A", 10))
            .with_link(LinkSpec::new("b1", "b1", "B1", 20))
            .with_link(LinkSpec::new("b2", "b2", "B2", 20));

        assert_eq!(keys(&provider.top_level(&ctx())), vec!["a", "b1", "b2", "c"]);
    }

    #[test]
    fn section_links_carry_parent_key() {
        let provider = StaticLinkProvider::new()
            .with_section_link("system", LinkSpec::new("ext", "ext_manager", "Extensions", 50));

        let links = provider.section("system", &ctx());
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].parent_key.as_deref(), Some("system"));
        assert!(provider.section("missing", &ctx()).is_empty());
    }

    #[test]
    fn gated_links_require_ability_unless_ignored() {
        let provider = StaticLinkProvider::new()
            .with_link(LinkSpec::new("posts", "post/list", "Posts", 10))
            .with_link(LinkSpec::new("admin", "admin", "Admin", 90).requiring(MANAGE_NAVLINKS));

        assert_eq!(keys(&provider.top_level(&ctx())), vec!["posts"]);

        let unrestricted = NavContext::ignoring_permissions("post/list");
        assert_eq!(keys(&provider.top_level(&unrestricted)), vec!["posts", "admin"]);
    }

    #[test]
    fn parses_json_with_defaults() {
        let provider = StaticLinkProvider::from_json(
            r#"{
                "links": [
                    {
                        "key": "posts", "target": "post/list", "label": "Posts",
                        "matches": ["post/"]
                    }
                ],
                "sections": {
                    "posts": [
                        { "key": "upload", "target": "upload", "label": "Upload", "order": 20 }
                    ]
                }
            }"#,
        )
        .unwrap();

        let top = provider.top_level(&ctx());
        assert_eq!(top[0].order, DEFAULT_ORDER);
        assert!(top[0].active);
        assert_eq!(provider.section("posts", &ctx())[0].order, 20);
    }

    #[test]
    fn duplicate_keys_in_one_scope_are_rejected() {
        let result = StaticLinkProvider::from_json(
            r#"{ "links": [
                { "key": "a", "target": "a", "label": "A" },
                { "key": "a", "target": "b", "label": "B" }
            ] }"#,
        );
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn malformed_json_is_a_validation_error() {
        assert_matches!(
            StaticLinkProvider::from_json("{ not json"),
            Err(CoreError::Validation(_))
        );
    }
}
