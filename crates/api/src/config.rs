use std::path::PathBuf;

use navmgr_core::pagination::DEFAULT_PAGE_SIZE;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Grace period for in-flight requests after a shutdown signal (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Navigation settings.
    pub nav: NavConfig,
}

/// Settings for navigation building and the admin table.
#[derive(Debug, Clone)]
pub struct NavConfig {
    /// JSON file describing the default link tree. `None` serves an empty tree.
    pub links_path: Option<PathBuf>,
    /// Page treated as the current location when a request names none.
    pub front_page: String,
    /// Rows per page of the admin table when the caller gives no limit.
    pub list_page_size: i64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            links_path: None,
            front_page: "post/list".to_string(),
            list_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl NavConfig {
    /// | Env Var              | Default     |
    /// |----------------------|-------------|
    /// | `NAV_LINKS_PATH`     | (none)      |
    /// | `FRONT_PAGE`         | `post/list` |
    /// | `NAV_LIST_PAGE_SIZE` | `100`       |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let links_path = std::env::var("NAV_LINKS_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let front_page = std::env::var("FRONT_PAGE").unwrap_or(defaults.front_page);

        let list_page_size: i64 = std::env::var("NAV_LIST_PAGE_SIZE")
            .unwrap_or_else(|_| defaults.list_page_size.to_string())
            .parse()
            .expect("NAV_LIST_PAGE_SIZE must be a valid i64");

        Self {
            links_path,
            front_page,
            list_page_size,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            nav: NavConfig::from_env(),
        }
    }
}
