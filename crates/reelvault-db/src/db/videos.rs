use chrono::Utc;
use reelvault_core::{
    models::{CreateVideoParams, Video},
    AppError,
};
use sqlx::{Sqlite, SqlitePool};
use uuid::Uuid;

const VIDEO_COLUMNS: &str =
    "id, created_at, updated_at, title, description, thumbnail_url, video_url, user_id";

/// Repository for video metadata
///
/// Ingestion writes only the asset reference columns, and only after the asset is durably
/// stored.
#[derive(Clone)]
pub struct VideoRepository {
    pool: SqlitePool,
}

impl VideoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, params), fields(db.table = "videos", db.operation = "insert"))]
    pub async fn create_video(
        &self,
        user_id: Uuid,
        params: &CreateVideoParams,
    ) -> Result<Video, AppError> {
        let now = Utc::now();
        let video = sqlx::query_as::<Sqlite, Video>(&format!(
            r#"
            INSERT INTO videos (id, created_at, updated_at, title, description, user_id)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            VIDEO_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(now)
        .bind(now)
        .bind(&params.title)
        .bind(&params.description)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(video)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %id))]
    pub async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<Sqlite, Video>(&format!(
            "SELECT {} FROM videos WHERE id = ?",
            VIDEO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    pub async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        let videos = sqlx::query_as::<Sqlite, Video>(&format!(
            "SELECT {} FROM videos WHERE user_id = ? ORDER BY created_at DESC",
            VIDEO_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(videos)
    }

    #[tracing::instrument(skip(self, reference), fields(db.table = "videos", db.operation = "update", db.record_id = %id))]
    pub async fn update_thumbnail_url(&self, id: Uuid, reference: &str) -> Result<Video, AppError> {
        self.update_reference("thumbnail_url", id, reference).await
    }

    #[tracing::instrument(skip(self, reference), fields(db.table = "videos", db.operation = "update", db.record_id = %id))]
    pub async fn update_video_url(&self, id: Uuid, reference: &str) -> Result<Video, AppError> {
        self.update_reference("video_url", id, reference).await
    }

    /// `column` is one of the two fixed reference columns, never caller input.
    async fn update_reference(
        &self,
        column: &'static str,
        id: Uuid,
        reference: &str,
    ) -> Result<Video, AppError> {
        let video = sqlx::query_as::<Sqlite, Video>(&format!(
            "UPDATE videos SET {} = ?, updated_at = ? WHERE id = ? RETURNING {}",
            column, VIDEO_COLUMNS
        ))
        .bind(reference)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        video.ok_or_else(|| AppError::NotFound("Video not found".to_string()))
    }

    /// Delete a video. Returns false when it did not exist.
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "delete", db.record_id = %id))]
    pub async fn delete_video(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM videos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
