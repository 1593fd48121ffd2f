/// Session persistence operations
///
/// Maps opaque session tokens to user ids with a TTL. Only the SHA-256
/// digest of a token is stored, so a leaked database cannot be replayed as
/// cookies.
use super::{unix_now, Result};
use crate::auth::generate_token;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use std::time::Duration;

/// Session repository for database operations
#[derive(Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
    ttl: Duration,
}

impl SessionRepository {
    /// Create a new session repository issuing sessions that live for `ttl`
    pub fn new(pool: SqlitePool, ttl: Duration) -> Self {
        Self { pool, ttl }
    }

    /// Create a session for `user_id` and return its token
    ///
    /// Expired sessions are purged on the way in.
    pub async fn create_session(&self, user_id: &str) -> Result<String> {
        self.purge_expired().await?;

        let token = generate_token();
        let now = unix_now();
        let expires_at = now.saturating_add(i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX));

        sqlx::query(
            "INSERT INTO sessions (token_hash, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(hash_token(&token))
        .bind(user_id)
        .bind(now)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(user_id = %user_id, "Created session");
        Ok(token)
    }

    /// Resolve a token to its user id, or `None` if unknown or expired
    pub async fn resolve_session(&self, token: &str) -> Result<Option<String>> {
        let user_id = sqlx::query_scalar(
            "SELECT user_id FROM sessions WHERE token_hash = ? AND expires_at > ?",
        )
        .bind(hash_token(token))
        .bind(unix_now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user_id)
    }

    /// Delete a session. Unknown tokens are ignored.
    pub async fn destroy_session(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(hash_token(token))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete every expired session, returning how many were removed
    pub async fn purge_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(unix_now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            tracing::debug!("Purged {} expired sessions", result.rows_affected());
        }
        Ok(result.rows_affected())
    }
}

fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
