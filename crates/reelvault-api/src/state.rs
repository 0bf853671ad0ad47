//! Application state shared by every handler.

use reelvault_core::Config;
use reelvault_db::{RefreshTokenRepository, UserRepository, VideoRepository};
use reelvault_processing::IngestionPipeline;
use reelvault_storage::AssetStore;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pool: SqlitePool,
    pub users: UserRepository,
    pub refresh_tokens: RefreshTokenRepository,
    pub videos: VideoRepository,
    /// Owns the asset store selected at startup
    pub pipeline: Arc<IngestionPipeline>,
}

impl AppState {
    pub fn new(config: Config, pool: SqlitePool, pipeline: IngestionPipeline) -> Self {
        AppState {
            config: Arc::new(config),
            users: UserRepository::new(pool.clone()),
            refresh_tokens: RefreshTokenRepository::new(pool.clone()),
            videos: VideoRepository::new(pool.clone()),
            pool,
            pipeline: Arc::new(pipeline),
        }
    }

    pub fn store(&self) -> &Arc<dyn AssetStore> {
        self.pipeline.store()
    }
}
