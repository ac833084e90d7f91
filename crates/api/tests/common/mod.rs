#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use navmgr_api::auth::jwt::{generate_access_token, JwtConfig};
use navmgr_api::config::{NavConfig, ServerConfig};
use navmgr_api::navigation::NavManagerLinks;
use navmgr_api::router::build_app_router;
use navmgr_api::state::AppState;
use navmgr_core::provider::{LinkSpec, StaticLinkProvider};
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
        nav: NavConfig::default(),
    }
}

/// Default tree used by the API tests.
///
/// ```text
/// posts  (10) -> posts_all (10), upload (20)
/// tags   (20)
/// system (90) -> ext (10), nav_manager (50, admins only)
/// ```
pub fn test_links() -> StaticLinkProvider {
    StaticLinkProvider::new()
        .with_link(LinkSpec::new("posts", "post/list", "Posts", 10).with_matches(&["post/"]))
        .with_link(LinkSpec::new("tags", "tags/list", "Tags", 20))
        .with_link(LinkSpec::new("system", "system", "System", 90))
        .with_section_link("posts", LinkSpec::new("posts_all", "post/list", "All", 10))
        .with_section_link("posts", LinkSpec::new("upload", "upload", "Upload", 20))
        .with_section_link("system", LinkSpec::new("ext", "ext_manager", "Extensions", 10))
}

/// Build the full application router over `links`.
pub fn build_test_app_with(pool: PgPool, links: StaticLinkProvider) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        links: Arc::new(NavManagerLinks::new(links)),
    };
    build_app_router(state, &config).expect("test config should build a router")
}

/// Build the full application router with the standard test tree.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_links())
}

/// Bearer token for user 1 with `role`.
pub fn token_for(role: &str) -> String {
    generate_access_token(1, role, &test_config().jwt).expect("token generation should succeed")
}

pub fn admin_token() -> String {
    token_for("admin")
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, builder(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, builder(Method::GET, uri, Some(token)).body(Body::empty()).unwrap()).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, builder(Method::POST, uri, Some(token)).body(Body::empty()).unwrap()).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = builder(Method::POST, uri, Some(token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Collect a response body as raw bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// Keys of the links in a `/navigation` response, in order.
pub fn link_keys(json: &serde_json::Value) -> Vec<String> {
    json["data"]["links"]
        .as_array()
        .expect("links array")
        .iter()
        .map(|link| link["key"].as_str().unwrap().to_string())
        .collect()
}

/// Run the import as an administrator.
pub async fn import(pool: &PgPool) {
    let response = post_auth(
        build_test_app(pool.clone()),
        "/api/v1/nav-manager/import",
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
}

/// Id of the stored row with `key` imported under `parent_key`.
pub async fn id_of(pool: &PgPool, key: &str, parent_key: Option<&str>) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT id FROM nav_link_override WHERE key = $1 AND parent_key IS NOT DISTINCT FROM $2",
    )
    .bind(key)
    .bind(parent_key)
    .fetch_one(pool)
    .await
    .expect("row should exist")
}
