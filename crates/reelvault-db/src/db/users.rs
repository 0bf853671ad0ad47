use chrono::Utc;
use reelvault_core::{models::User, AppError};
use sqlx::{Sqlite, SqlitePool};
use uuid::Uuid;

/// Repository for user accounts
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a user with an already-hashed password
    #[tracing::instrument(skip(self, password_hash), fields(db.table = "users", db.operation = "insert"))]
    pub async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let now = Utc::now();
        let result = sqlx::query_as::<Sqlite, User>(
            r#"
            INSERT INTO users (id, created_at, updated_at, email, password)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, created_at, updated_at, email, password
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(now)
        .bind(now)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                AppError::InvalidInput("A user with that email already exists".to_string()),
            ),
            Err(e) => Err(e.into()),
        }
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<Sqlite, User>(
            "SELECT id, created_at, updated_at, email, password FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select", db.record_id = %id))]
    pub async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<Sqlite, User>(
            "SELECT id, created_at, updated_at, email, password FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
