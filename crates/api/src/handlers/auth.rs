//! Handlers for the `/auth` resource (register, login, refresh, logout).
//!
//! The access token goes out in the JSON body for bearer use. The refresh
//! token only ever travels in the `refresh_token` cookie.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use taskflow_core::types::DbId;

use crate::auth::cookies::{clear_refresh_cookie, refresh_cookie, refresh_token_from_headers};
use crate::auth::session::{AuthError, SessionTokens, SessionUser};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: SessionUser,
}

/// Identity of the bearer, as carried by the access token.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: DbId,
    pub email: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SessionUser>>)> {
    let user = state
        .sessions
        .register(&input.name, &input.email, &input.password)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Starts a new token family.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Response> {
    let tokens = state.sessions.login(&input.email, &input.password).await?;
    Ok(session_response(&state, tokens))
}

/// POST /api/v1/auth/refresh
///
/// Rotate the refresh token from the cookie. Any failure also clears the
/// cookie so the client falls back to a full login.
pub async fn refresh(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let result = match refresh_token_from_headers(&headers) {
        Some(raw) => state.sessions.refresh(&raw).await,
        None => Err(AuthError::InvalidRefreshToken),
    };

    match result {
        Ok(tokens) => session_response(&state, tokens),
        Err(e) => (
            [(SET_COOKIE, clear_refresh_cookie(state.config.cookie_secure))],
            AppError::from(e),
        )
            .into_response(),
    }
}

/// POST /api/v1/auth/logout
///
/// Revoke the family of the cookie's refresh token, if any. Always 204.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    if let Some(raw) = refresh_token_from_headers(&headers) {
        state.sessions.logout(&raw).await?;
    }
    Ok(cleared_response(&state))
}

/// POST /api/v1/auth/logout-all
///
/// Revoke every session of the authenticated user. Returns 204 No Content.
pub async fn logout_all(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<Response> {
    state.sessions.logout_all(auth_user.user_id).await?;
    Ok(cleared_response(&state))
}

/// GET /api/v1/auth/me
pub async fn me(auth_user: AuthUser) -> Json<DataResponse<MeResponse>> {
    Json(DataResponse {
        data: MeResponse {
            id: auth_user.user_id,
            email: auth_user.email,
        },
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn session_response(state: &AppState, tokens: SessionTokens) -> Response {
    let cookie = refresh_cookie(
        &tokens.refresh_token,
        state.sessions.jwt_config().refresh_token_expiry_days,
        state.config.cookie_secure,
    );
    let body = AuthResponse {
        access_token: tokens.access_token,
        expires_in: tokens.expires_in,
        user: tokens.user,
    };
    ([(SET_COOKIE, cookie)], Json(body)).into_response()
}

fn cleared_response(state: &AppState) -> Response {
    (
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, clear_refresh_cookie(state.config.cookie_secure))],
    )
        .into_response()
}
