use reelvault_core::AppError;
use sqlx::SqlitePool;

/// Delete every row from every table in one transaction.
#[tracing::instrument(skip(pool), fields(db.operation = "delete"))]
pub async fn reset_database(pool: &SqlitePool) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    for table in ["refresh_tokens", "videos", "users"] {
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    tracing::warn!("Database reset");
    Ok(())
}
