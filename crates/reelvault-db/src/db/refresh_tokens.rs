use chrono::{DateTime, Utc};
use reelvault_core::{models::RefreshToken, AppError};
use sqlx::{Sqlite, SqlitePool};
use uuid::Uuid;

/// Repository for long-lived refresh tokens
#[derive(Clone)]
pub struct RefreshTokenRepository {
    pool: SqlitePool,
}

impl RefreshTokenRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, token), fields(db.table = "refresh_tokens", db.operation = "insert"))]
    pub async fn create_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken, AppError> {
        let now = Utc::now();
        let token = sqlx::query_as::<Sqlite, RefreshToken>(
            r#"
            INSERT INTO refresh_tokens (token, user_id, created_at, updated_at, expires_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING token, user_id, created_at, updated_at, expires_at, revoked_at
            "#,
        )
        .bind(token)
        .bind(user_id)
        .bind(now)
        .bind(now)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(token)
    }

    /// Look up a token that is neither revoked nor expired
    #[tracing::instrument(skip(self, token), fields(db.table = "refresh_tokens", db.operation = "select"))]
    pub async fn get_active_token(&self, token: &str) -> Result<Option<RefreshToken>, AppError> {
        let found = sqlx::query_as::<Sqlite, RefreshToken>(
            r#"
            SELECT token, user_id, created_at, updated_at, expires_at, revoked_at
            FROM refresh_tokens
            WHERE token = ?
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found.filter(|t| t.is_active(Utc::now())))
    }

    /// Revoke a token. Returns false when no such token exists.
    #[tracing::instrument(skip(self, token), fields(db.table = "refresh_tokens", db.operation = "update"))]
    pub async fn revoke_token(&self, token: &str) -> Result<bool, AppError> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = ?, updated_at = ? WHERE token = ? AND revoked_at IS NULL",
        )
        .bind(now)
        .bind(now)
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
