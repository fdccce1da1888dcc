//! Repository for the `refresh_tokens` table.

use sqlx::PgPool;
use taskflow_core::types::{DbId, Timestamp};
use uuid::Uuid;

use crate::models::refresh_token::{CreateRefreshToken, RefreshToken};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, token_hash, family, expires_at, revoked_at, created_at";

/// Provides persistence operations for refresh tokens.
pub struct RefreshTokenRepo;

impl RefreshTokenRepo {
    /// Insert a new refresh token, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateRefreshToken,
    ) -> Result<RefreshToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO refresh_tokens (user_id, token_hash, family, expires_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RefreshToken>(&query)
            .bind(input.user_id)
            .bind(&input.token_hash)
            .bind(input.family)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a token by hash, whatever its revocation or expiry state.
    ///
    /// Callers need revoked rows to detect reuse.
    pub async fn find_by_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM refresh_tokens WHERE token_hash = $1");
        sqlx::query_as::<_, RefreshToken>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke `current_id` and insert its successor in one transaction.
    ///
    /// The revoke is conditional on the row still being live. If another
    /// request revoked it first, nothing is inserted and `None` is returned.
    pub async fn rotate(
        pool: &PgPool,
        current_id: DbId,
        next: &CreateRefreshToken,
    ) -> Result<Option<RefreshToken>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let revoked = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW()
             WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(current_id)
        .execute(&mut *tx)
        .await?;

        if revoked.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO refresh_tokens (user_id, token_hash, family, expires_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, RefreshToken>(&query)
            .bind(next.user_id)
            .bind(&next.token_hash)
            .bind(next.family)
            .bind(next.expires_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(created))
    }

    /// Revoke a single token. Returns `true` if the row was updated.
    pub async fn revoke(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke every live token in a family. Returns the count revoked.
    pub async fn revoke_family(pool: &PgPool, family: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW()
             WHERE family = $1 AND revoked_at IS NULL",
        )
        .bind(family)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Revoke every live token belonging to a user. Returns the count revoked.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW()
             WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete tokens expired before `now` or revoked before `revoked_before`.
    pub async fn delete_stale(
        pool: &PgPool,
        now: Timestamp,
        revoked_before: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM refresh_tokens WHERE expires_at < $1 OR revoked_at < $2",
        )
        .bind(now)
        .bind(revoked_before)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
