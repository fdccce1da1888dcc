//! HTTP-level integration tests for the `/auth` endpoints.
//!
//! Covers registration, login, cookie-based refresh with rotation and reuse
//! detection, logout, logout-all, and bearer authentication.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, get, get_auth, login, post_auth, post_json,
    post_with_refresh_cookie, refresh_set_cookie, refresh_token_of, register, PASSWORD,
};
use http_body_util::BodyExt;

// ---------------------------------------------------------------------------
// Register / login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_returns_created_user_without_secrets() {
    let (app, _store) = build_test_app();

    let body = serde_json::json!({
        "name": "Ada Lovelace",
        "email": "Ada@Example.com",
        "password": PASSWORD,
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "ada@example.com");
    assert_eq!(json["data"]["name"], "Ada Lovelace");
    assert!(json["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn register_rejects_weak_password_and_duplicates() {
    let (app, _store) = build_test_app();

    let weak = serde_json::json!({ "name": "Ada", "email": "ada@example.com", "password": "weakpass" });
    let response = post_json(app.clone(), "/api/v1/auth/register", weak).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    register(app.clone(), "Ada", "ada@example.com").await;
    let dup = serde_json::json!({ "name": "Ada", "email": "ada@example.com", "password": PASSWORD });
    let response = post_json(app, "/api/v1/auth/register", dup).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Access token in the body, refresh token only in a hardened cookie.
#[tokio::test]
async fn login_sets_refresh_cookie_and_returns_access_token() {
    let (app, _store) = build_test_app();
    register(app.clone(), "Ada", "ada@example.com").await;

    let body = serde_json::json!({ "email": "ada@example.com", "password": PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = refresh_set_cookie(&response).expect("refresh cookie must be set");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(cookie.contains("Path=/api/v1/auth"));
    assert!(cookie.contains("Max-Age=604800"));

    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["expires_in"], 900);
    assert_eq!(json["user"]["email"], "ada@example.com");
    assert!(json.get("refresh_token").is_none(), "refresh token never goes in the body");
}

/// Unknown email and wrong password produce the same response.
#[tokio::test]
async fn login_failures_are_uniform() {
    let (app, _store) = build_test_app();
    register(app.clone(), "Ada", "ada@example.com").await;

    let unknown = post_json(
        app.clone(),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "ghost@example.com", "password": PASSWORD }),
    )
    .await;
    let wrong = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": "ada@example.com", "password": "Wr0ng!pass" }),
    )
    .await;

    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(unknown).await, body_json(wrong).await);
}

/// Status and raw body of the last of `attempts` consecutive failed logins for `email`.
async fn nth_failed_login(app: axum::Router, email: &str, attempts: usize) -> (StatusCode, Vec<u8>) {
    let wrong = serde_json::json!({ "email": email, "password": "Wr0ng!pass" });
    let mut last = None;
    for _ in 0..attempts {
        let response = post_json(app.clone(), "/api/v1/auth/login", wrong.clone()).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes().to_vec();
        last = Some((status, bytes));
    }
    last.unwrap()
}

/// Lockout must not tell a registered email apart from an unknown one.
#[tokio::test]
async fn lockout_does_not_reveal_registered_emails() {
    let (app, _store) = build_test_app();
    register(app.clone(), "Ada", "ada@example.com").await;

    let registered = nth_failed_login(app.clone(), "ada@example.com", 6).await;
    let unknown = nth_failed_login(app.clone(), "ghost@example.com", 6).await;

    assert_eq!(registered.0, StatusCode::UNAUTHORIZED);
    assert_eq!(registered, unknown);

    // While locked, even the right password gets the same answer.
    let right = serde_json::json!({ "email": "ada@example.com", "password": PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", right).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(refresh_set_cookie(&response).is_none());
    let bytes = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    assert_eq!(bytes, unknown.1);
}

// ---------------------------------------------------------------------------
// Refresh
// ---------------------------------------------------------------------------

/// login -> refresh -> refresh with the stale token -> the rotated token is dead too.
#[tokio::test]
async fn reused_refresh_token_burns_the_session() {
    let (app, _store) = build_test_app();
    register(app.clone(), "Ada", "ada@example.com").await;
    let (_, original) = login(app.clone(), "ada@example.com").await;

    let response = post_with_refresh_cookie(app.clone(), "/api/v1/auth/refresh", &original).await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = refresh_token_of(&response);
    assert_ne!(rotated, original);
    assert!(body_json(response).await["access_token"].is_string());

    let response = post_with_refresh_cookie(app.clone(), "/api/v1/auth/refresh", &original).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let cleared = refresh_set_cookie(&response).expect("failed refresh clears the cookie");
    assert!(cleared.contains("Max-Age=0"));
    assert_eq!(body_json(response).await["code"], "REFRESH_TOKEN_REUSED");

    let response = post_with_refresh_cookie(app, "/api/v1/auth/refresh", &rotated).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "REFRESH_TOKEN_REUSED");
}

#[tokio::test]
async fn refresh_without_cookie_is_unauthorized() {
    let (app, _store) = build_test_app();
    let response = send_empty_post(app, "/api/v1/auth/refresh").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "INVALID_REFRESH_TOKEN");
}

async fn send_empty_post(app: axum::Router, uri: &str) -> axum::http::Response<axum::body::Body> {
    let request = axum::http::Request::builder()
        .method(axum::http::Method::POST)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    common::send(app, request).await
}

// ---------------------------------------------------------------------------
// Logout
// ---------------------------------------------------------------------------

#[tokio::test]
async fn logout_clears_cookie_and_kills_the_family() {
    let (app, _store) = build_test_app();
    register(app.clone(), "Ada", "ada@example.com").await;
    let (_, first) = login(app.clone(), "ada@example.com").await;

    let response = post_with_refresh_cookie(app.clone(), "/api/v1/auth/refresh", &first).await;
    let second = refresh_token_of(&response);

    let response = post_with_refresh_cookie(app.clone(), "/api/v1/auth/logout", &second).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cleared = refresh_set_cookie(&response).unwrap();
    assert!(cleared.contains("Max-Age=0"));

    let response = post_with_refresh_cookie(app, "/api/v1/auth/refresh", &second).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_without_cookie_still_succeeds() {
    let (app, _store) = build_test_app();
    let response = send_empty_post(app, "/api/v1/auth/logout").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn logout_all_ends_every_device_session() {
    let (app, _store) = build_test_app();
    register(app.clone(), "Ada", "ada@example.com").await;
    let (access, laptop) = login(app.clone(), "ada@example.com").await;
    let (_, phone) = login(app.clone(), "ada@example.com").await;

    let response = post_auth(app.clone(), "/api/v1/auth/logout-all", &access).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    for raw in [laptop, phone] {
        let response = post_with_refresh_cookie(app.clone(), "/api/v1/auth/refresh", &raw).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

// ---------------------------------------------------------------------------
// Bearer authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn me_requires_a_valid_bearer_token() {
    let (app, _store) = build_test_app();
    let id = register(app.clone(), "Ada", "ada@example.com").await;
    let (access, _) = login(app.clone(), "ada@example.com").await;

    let response = get_auth(app.clone(), "/api/v1/auth/me", &access).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], id);
    assert_eq!(json["data"]["email"], "ada@example.com");

    let response = get(app.clone(), "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app, "/api/v1/auth/me", "not.a.jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_reports_store_status() {
    let (app, _store) = build_test_app();
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("x-request-id").is_some());
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}
