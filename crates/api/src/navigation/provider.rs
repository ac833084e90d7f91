//! The application's default link provider.

use navmgr_core::error::CoreError;
use navmgr_core::nav_link::{DefaultLink, NavContext};
use navmgr_core::permissions::MANAGE_NAVLINKS;
use navmgr_core::provider::{DefaultLinkProvider, LinkSpec, StaticLinkProvider};

use crate::config::NavConfig;

/// Key of the admin entry contributed to the `system` section.
pub const NAV_MANAGER_KEY: &str = "nav_manager";

/// Section that hosts administrative pages.
pub const SYSTEM_SECTION: &str = "system";

/// Page of the navigation manager's link table.
pub const NAV_MANAGER_PAGE: &str = "nav_manager/list";

/// Wraps another provider and adds the "Navigation Manager" entry to the
/// `system` section for callers allowed to manage links.
#[derive(Debug, Clone)]
pub struct NavManagerLinks<P> {
    inner: P,
}

impl<P: DefaultLinkProvider> NavManagerLinks<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: DefaultLinkProvider> DefaultLinkProvider for NavManagerLinks<P> {
    fn top_level(&self, ctx: &NavContext) -> Vec<DefaultLink> {
        self.inner.top_level(ctx)
    }

    fn section(&self, section_key: &str, ctx: &NavContext) -> Vec<DefaultLink> {
        let mut links = self.inner.section(section_key, ctx);
        if section_key == SYSTEM_SECTION && ctx.can(MANAGE_NAVLINKS) {
            let entry = LinkSpec::new(NAV_MANAGER_KEY, NAV_MANAGER_PAGE, "Navigation Manager", 50)
                .with_matches(&[NAV_MANAGER_KEY]);
            links.push(entry.build(Some(section_key), ctx));
            links.sort_by_key(|link| link.order);
        }
        links
    }
}

/// Build the provider described by `config`.
///
/// Without a link file the default tree is empty apart from the admin entry.
pub fn load_provider(config: &NavConfig) -> Result<NavManagerLinks<StaticLinkProvider>, CoreError> {
    let links = match &config.links_path {
        Some(path) => {
            let provider = StaticLinkProvider::from_path(path)?;
            tracing::info!(path = %path.display(), "Loaded default navigation links");
            provider
        }
        None => {
            tracing::warn!("NAV_LINKS_PATH not set, serving an empty default navigation tree");
            StaticLinkProvider::new()
        }
    };
    Ok(NavManagerLinks::new(links))
}

#[cfg(test)]
mod tests {
    use navmgr_core::permissions::{Abilities, ROLE_ADMIN, ROLE_USER};

    use super::*;

    fn provider() -> NavManagerLinks<StaticLinkProvider> {
        NavManagerLinks::new(
            StaticLinkProvider::new()
                .with_link(LinkSpec::new(SYSTEM_SECTION, "system", "System", 90))
                .with_section_link(
                    SYSTEM_SECTION,
                    LinkSpec::new("ext", "ext_manager", "Extensions", 10),
                )
                .with_section_link(SYSTEM_SECTION, LinkSpec::new("logs", "log/view", "Logs", 80)),
        )
    }

    fn keys(links: &[DefaultLink]) -> Vec<&str> {
        links.iter().map(|l| l.key.as_str()).collect()
    }

    #[test]
    fn admin_sees_nav_manager_entry_in_order() {
        let admin = Abilities::for_role(ROLE_ADMIN);
        let ctx = NavContext::new(Some(NAV_MANAGER_PAGE), "post/list", admin);
        let links = provider().section(SYSTEM_SECTION, &ctx);

        assert_eq!(keys(&links), vec!["ext", NAV_MANAGER_KEY, "logs"]);
        assert!(links[1].active);
    }

    #[test]
    fn other_users_do_not_see_nav_manager_entry() {
        let ctx = NavContext::new(None, "post/list", Abilities::for_role(ROLE_USER));
        assert_eq!(keys(&provider().section(SYSTEM_SECTION, &ctx)), vec!["ext", "logs"]);
    }

    #[test]
    fn permission_free_context_includes_entry() {
        let ctx = NavContext::ignoring_permissions("post/list");
        assert!(keys(&provider().section(SYSTEM_SECTION, &ctx)).contains(&NAV_MANAGER_KEY));
    }

    #[test]
    fn other_sections_are_untouched() {
        let ctx = NavContext::ignoring_permissions("post/list");
        assert!(provider().section("posts", &ctx).is_empty());
        assert_eq!(keys(&provider().top_level(&ctx)), vec![SYSTEM_SECTION]);
    }

    #[test]
    fn missing_links_file_yields_empty_tree() {
        let provider = load_provider(&NavConfig::default()).unwrap();
        let ctx = NavContext::new(None, "post/list", Abilities::none());
        assert!(provider.top_level(&ctx).is_empty());
    }

    #[test]
    fn sample_links_file_loads() {
        let config = NavConfig {
            links_path: Some(
                std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
                    .join("../../config/nav_links.json"),
            ),
            ..NavConfig::default()
        };
        let provider = load_provider(&config).unwrap();

        let anonymous = NavContext::new(None, "post/list", Abilities::none());
        let top = provider.top_level(&anonymous);
        assert_eq!(keys(&top), vec!["posts", "comment", "tags", "help"]);
        assert!(top[0].active);

        let admin = NavContext::new(None, "post/list", Abilities::for_role(ROLE_ADMIN));
        assert!(keys(&provider.top_level(&admin)).contains(&SYSTEM_SECTION));
        assert_eq!(
            keys(&provider.section(SYSTEM_SECTION, &admin)),
            vec!["ext_manager", "setup", NAV_MANAGER_KEY]
        );
    }
}
