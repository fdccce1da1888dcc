//! Refresh token model and DTOs.

use sqlx::FromRow;
use taskflow_core::types::{DbId, Timestamp};
use uuid::Uuid;

/// A row from the `refresh_tokens` table.
///
/// Only the SHA-256 hash of the opaque secret is stored. Every token issued
/// from one login shares a `family`.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub family: Uuid,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl RefreshToken {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at < now
    }
}

/// DTO for inserting a refresh token.
#[derive(Debug, Clone)]
pub struct CreateRefreshToken {
    pub user_id: DbId,
    pub token_hash: String,
    pub family: Uuid,
    pub expires_at: Timestamp,
}
