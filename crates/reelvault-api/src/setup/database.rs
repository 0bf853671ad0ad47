//! Database setup and initialization

use anyhow::Result;
use reelvault_core::Config;
use sqlx::SqlitePool;

/// Setup database connection pool and run migrations
pub async fn setup_database(config: &Config) -> Result<SqlitePool> {
    tracing::info!("Connecting to database...");
    let pool = reelvault_db::connect(&config.database_url).await?;

    reelvault_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}
