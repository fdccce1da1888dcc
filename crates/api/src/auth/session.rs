//! Session manager: login, refresh-token rotation, reuse detection, logout.
//!
//! Every login starts a new token *family*. Each successful refresh revokes
//! the presented token and issues its successor in the same family, so a
//! family has at most one live token. Presenting a token that was already
//! rotated away means two parties hold descendants of the same login: the
//! whole family is revoked and the caller must authenticate again.
//!
//! ```text
//! ACTIVE --refresh--> ROTATED (successor ACTIVE)
//! ACTIVE --logout---> LOGGED_OUT
//! any    --reuse----> COMPROMISED
//! ```
//!
//! LOGGED_OUT and COMPROMISED are terminal.

use std::sync::{Arc, LazyLock};

use chrono::Utc;
use serde::Serialize;
use taskflow_core::credentials::{normalize_email, validate_registration};
use taskflow_core::error::CoreError;
use taskflow_core::types::DbId;
use taskflow_db::models::refresh_token::CreateRefreshToken;
use taskflow_db::models::user::{CreateUser, User};
use taskflow_db::{StoreError, TokenStore};
use uuid::Uuid;

use crate::auth::jwt::{
    generate_access_token, generate_refresh_token, hash_refresh_token, validate_token,
    AccessClaims, JwtConfig,
};
use crate::auth::password::{hash_password, verify_password};

/// Maximum consecutive failed login attempts before locking the account.
pub const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Duration in minutes to lock an account after exceeding failed attempts.
pub const LOCK_DURATION_MINS: i64 = 15;

/// Default retention for revoked refresh tokens before the sweep deletes them.
pub const DEFAULT_REVOKED_RETENTION_DAYS: i64 = 30;

/// Hash verified against when the email is unknown, so that path costs the
/// same Argon2 work as a real account. `None` only if hashing itself fails.
static DUMMY_PASSWORD_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("taskflow-timing-equaliser").ok());

/// Run an Argon2 verification whose outcome is ignored.
fn burn_verification(password: &str, hash: Option<&str>) {
    if let Some(hash) = hash {
        let _ = verify_password(password, hash);
    }
}

/// Failures of the session manager.
///
/// The HTTP layer maps these onto status codes; see `crate::error`.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown email, wrong password, or locked account. One message for all.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    /// A rotated-away token was presented; its family has been revoked.
    #[error("Token already used, all sessions terminated")]
    RefreshTokenReused,

    #[error("Refresh token expired")]
    RefreshTokenExpired,

    #[error("Invalid or expired token")]
    InvalidAccessToken,

    #[error("Email is already registered")]
    EmailTaken,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Internal(String),
}

/// Public user info returned with a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    pub id: DbId,
    pub name: String,
    pub email: String,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Tokens issued by login and refresh.
///
/// `refresh_token` is the raw secret; it is handed out exactly once.
#[derive(Debug, Clone)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: SessionUser,
}

/// Issues and rotates sessions against an injected [`TokenStore`].
pub struct SessionManager {
    store: Arc<dyn TokenStore>,
    jwt: JwtConfig,
    revoked_retention: chrono::Duration,
}

impl SessionManager {
    pub fn new(store: Arc<dyn TokenStore>, jwt: JwtConfig, revoked_retention_days: i64) -> Self {
        Self {
            store,
            jwt,
            revoked_retention: chrono::Duration::days(revoked_retention_days),
        }
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt
    }

    /// Create an account. The email is stored trimmed and lower-cased.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<SessionUser, AuthError> {
        let email = normalize_email(email);
        validate_registration(name, &email, password).map_err(|e| match e {
            CoreError::Validation(msg) => AuthError::Validation(msg),
            other => AuthError::Internal(other.to_string()),
        })?;

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(password)
            .map_err(|e| AuthError::Internal(format!("Password hashing error: {e}")))?;

        let input = CreateUser {
            name: name.trim().to_string(),
            email,
            password_hash,
        };
        let user = self.store.create_user(&input).await.map_err(|e| match e {
            StoreError::Conflict(_) => AuthError::EmailTaken,
            StoreError::Database(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                AuthError::EmailTaken
            }
            other => AuthError::Store(other),
        })?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(SessionUser::from(&user))
    }

    /// Verify credentials and start a new token family.
    ///
    /// Unknown email, wrong password, and a locked account all fail with
    /// [`AuthError::InvalidCredentials`], and each path runs one Argon2
    /// verification, so neither the response nor its latency reveals which
    /// emails are registered.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionTokens, AuthError> {
        let email = normalize_email(email);
        let Some(user) = self.store.find_user_by_email(&email).await? else {
            burn_verification(password, DUMMY_PASSWORD_HASH.as_deref());
            return Err(AuthError::InvalidCredentials);
        };

        let now = Utc::now();
        if user.is_locked_at(now) {
            burn_verification(password, Some(&user.password_hash));
            tracing::warn!(user_id = user.id, "Login attempt on locked account");
            return Err(AuthError::InvalidCredentials);
        }

        let password_valid = verify_password(password, &user.password_hash)
            .map_err(|e| AuthError::Internal(format!("Password verification error: {e}")))?;

        if !password_valid {
            let failures = user.failed_login_count + 1;
            let lock_until = (failures >= MAX_FAILED_ATTEMPTS)
                .then(|| now + chrono::Duration::minutes(LOCK_DURATION_MINS));
            self.store.record_failed_login(user.id, lock_until).await?;

            if lock_until.is_some() {
                tracing::warn!(user_id = user.id, failures, "Account locked after failed logins");
            } else {
                tracing::info!(user_id = user.id, failures, "Failed login");
            }
            return Err(AuthError::InvalidCredentials);
        }

        self.store.record_successful_login(user.id).await?;

        let family = Uuid::new_v4();
        let tokens = self.start_family(&user, family).await?;
        tracing::info!(user_id = user.id, %family, "User logged in");
        Ok(tokens)
    }

    /// Exchange a refresh token for a new access token and its successor.
    ///
    /// - Unknown token: [`AuthError::InvalidRefreshToken`].
    /// - Already revoked: the family is revoked, [`AuthError::RefreshTokenReused`].
    /// - Expired: this token alone is revoked, [`AuthError::RefreshTokenExpired`].
    /// - Otherwise the token is revoked and its successor inserted atomically.
    ///   Losing that race to a concurrent refresh counts as reuse.
    pub async fn refresh(&self, raw_token: &str) -> Result<SessionTokens, AuthError> {
        let token = self
            .store
            .find_refresh_token(&hash_refresh_token(raw_token))
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        if token.is_revoked() {
            return Err(self.burn_family(token.user_id, token.family).await?);
        }

        let now = Utc::now();
        if token.is_expired_at(now) {
            self.store.revoke_refresh_token(token.id).await?;
            tracing::info!(user_id = token.user_id, family = %token.family, "Expired refresh token presented");
            return Err(AuthError::RefreshTokenExpired);
        }

        let Some(user) = self.store.find_user_by_id(token.user_id).await? else {
            self.store.revoke_family(token.family).await?;
            return Err(AuthError::InvalidRefreshToken);
        };

        let (raw_next, hash_next) = generate_refresh_token();
        let next = CreateRefreshToken {
            user_id: user.id,
            token_hash: hash_next,
            family: token.family,
            expires_at: now + self.jwt.refresh_token_ttl(),
        };

        if self.store.rotate_refresh_token(token.id, &next).await?.is_none() {
            return Err(self.burn_family(user.id, token.family).await?);
        }

        tracing::debug!(user_id = user.id, family = %token.family, "Refresh token rotated");
        self.tokens_for(&user, raw_next)
    }

    /// Revoke the whole family of `raw_token`. Unknown tokens are ignored.
    pub async fn logout(&self, raw_token: &str) -> Result<u64, AuthError> {
        let Some(token) = self
            .store
            .find_refresh_token(&hash_refresh_token(raw_token))
            .await?
        else {
            return Ok(0);
        };

        let revoked = self.store.revoke_family(token.family).await?;
        tracing::info!(user_id = token.user_id, family = %token.family, revoked, "User logged out");
        Ok(revoked)
    }

    /// Revoke every family of a user.
    pub async fn logout_all(&self, user_id: DbId) -> Result<u64, AuthError> {
        let revoked = self.store.revoke_all_for_user(user_id).await?;
        tracing::info!(user_id, revoked, "User logged out of all sessions");
        Ok(revoked)
    }

    /// Delete tokens that are expired or were revoked before the retention window.
    pub async fn cleanup_expired_tokens(&self) -> Result<u64, AuthError> {
        let now = Utc::now();
        Ok(self
            .store
            .delete_stale_refresh_tokens(now, now - self.revoked_retention)
            .await?)
    }

    /// Check an access token's signature, issuer, audience, and expiry.
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, AuthError> {
        validate_token(token, &self.jwt).map_err(|_| AuthError::InvalidAccessToken)
    }

    async fn start_family(&self, user: &User, family: Uuid) -> Result<SessionTokens, AuthError> {
        let (raw, hash) = generate_refresh_token();
        let input = CreateRefreshToken {
            user_id: user.id,
            token_hash: hash,
            family,
            expires_at: Utc::now() + self.jwt.refresh_token_ttl(),
        };
        self.store.insert_refresh_token(&input).await?;
        self.tokens_for(user, raw)
    }

    fn tokens_for(&self, user: &User, refresh_token: String) -> Result<SessionTokens, AuthError> {
        let access_token = generate_access_token(user.id, &user.email, &self.jwt)
            .map_err(|e| AuthError::Internal(format!("Token generation error: {e}")))?;

        Ok(SessionTokens {
            access_token,
            refresh_token,
            expires_in: self.jwt.access_token_ttl_secs(),
            user: SessionUser::from(user),
        })
    }

    async fn burn_family(&self, user_id: DbId, family: Uuid) -> Result<AuthError, AuthError> {
        let revoked = self.store.revoke_family(family).await?;
        tracing::warn!(user_id, %family, revoked, "Refresh token reuse detected; family revoked");
        Ok(AuthError::RefreshTokenReused)
    }
}
