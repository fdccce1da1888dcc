//! Shared helpers for HTTP integration tests.
//!
//! Tests drive the real router (same middleware stack as production) with
//! `tower::ServiceExt::oneshot`, backed by a fresh in-memory store per app.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use taskflow_api::auth::jwt::JwtConfig;
use taskflow_api::auth::session::SessionManager;
use taskflow_api::config::ServerConfig;
use taskflow_api::router::build_app_router;
use taskflow_api::state::AppState;
use taskflow_db::MemoryStore;

/// Password satisfying every strength rule.
pub const PASSWORD: &str = "Str0ng!pass";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        cookie_secure: false,
        token_cleanup_interval_secs: 3600,
        revoked_token_retention_days: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router over a fresh [`MemoryStore`].
///
/// The store handle is returned too so tests can inspect persisted state.
pub fn build_test_app() -> (Router, MemoryStore) {
    let config = test_config();
    let store = MemoryStore::new();

    let sessions = Arc::new(SessionManager::new(
        Arc::new(store.clone()),
        config.jwt.clone(),
        config.revoked_token_retention_days,
    ));
    let state = AppState {
        config: Arc::new(config.clone()),
        sessions,
        board: Arc::new(store.clone()),
    };

    (build_app_router(state, &config), store)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, None, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, Some(token), None)).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, request(Method::POST, uri, None, Some(body))).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, request(Method::POST, uri, Some(token), Some(body))).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::POST, uri, Some(token), None)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, request(Method::PUT, uri, Some(token), Some(body))).await
}

pub async fn patch_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, request(Method::PATCH, uri, Some(token), Some(body))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::DELETE, uri, Some(token), None)).await
}

/// POST with no body and the given raw refresh token in the `Cookie` header.
pub async fn post_with_refresh_cookie(app: Router, uri: &str, raw: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(COOKIE, format!("refresh_token={raw}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `Set-Cookie` header for the refresh token, if the response has one.
pub fn refresh_set_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("refresh_token="))
        .map(str::to_string)
}

/// The raw refresh token carried by the response's `Set-Cookie` header.
pub fn refresh_token_of(response: &Response<Body>) -> String {
    let cookie = refresh_set_cookie(response).expect("response should set the refresh cookie");
    cookie
        .trim_start_matches("refresh_token=")
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

// ---------------------------------------------------------------------------
// Flow helpers
// ---------------------------------------------------------------------------

/// Register a user and return its id.
pub async fn register(app: Router, name: &str, email: &str) -> i64 {
    let body = serde_json::json!({ "name": name, "email": email, "password": PASSWORD });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Log in and return `(access_token, raw_refresh_token)`.
pub async fn login(app: Router, email: &str) -> (String, String) {
    let body = serde_json::json!({ "email": email, "password": PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), 200);
    let refresh = refresh_token_of(&response);
    let json = body_json(response).await;
    (json["access_token"].as_str().unwrap().to_string(), refresh)
}

/// Register and log in. Returns `(user_id, access_token)`.
pub async fn signed_in_user(app: Router, name: &str, email: &str) -> (i64, String) {
    let id = register(app.clone(), name, email).await;
    let (access, _) = login(app, email).await;
    (id, access)
}
