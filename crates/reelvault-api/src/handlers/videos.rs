//! Video metadata handlers.
//!
//! Stored asset references are resolved through the active `AssetStore` on every read,
//! so presigned URLs are minted per request and never persisted.

use crate::auth::AuthUser;
use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use reelvault_core::models::{CreateVideoParams, Video};
use reelvault_core::AppError;
use reelvault_storage::AssetStore;
use std::sync::Arc;
use uuid::Uuid;

/// Replace stored references with client-usable URLs.
pub async fn resolve_video(store: &dyn AssetStore, mut video: Video) -> Result<Video, HttpAppError> {
    if let Some(reference) = video.thumbnail_url.take() {
        video.thumbnail_url = Some(store.resolve_url(&reference).await?);
    }
    if let Some(reference) = video.video_url.take() {
        video.video_url = Some(store.resolve_url(&reference).await?);
    }
    Ok(video)
}

pub(crate) async fn find_video(state: &AppState, video_id: &str) -> Result<Video, HttpAppError> {
    let id = Uuid::parse_str(video_id)
        .map_err(|_| AppError::InvalidInput("Invalid video ID".to_string()))?;

    let video = state
        .videos
        .get_video(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Couldn't get video".to_string()))?;

    Ok(video)
}

pub async fn create_video(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidatedJson(params): ValidatedJson<CreateVideoParams>,
) -> Result<(StatusCode, Json<Video>), HttpAppError> {
    if params.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Title is required".to_string()).into());
    }

    let video = state.videos.create_video(auth.user_id, &params).await?;

    tracing::info!(video_id = %video.id, user_id = %auth.user_id, "Video created");

    Ok((StatusCode::CREATED, Json(video)))
}

pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Vec<Video>>, HttpAppError> {
    let videos = state.videos.list_videos_for_user(auth.user_id).await?;

    let mut resolved = Vec::with_capacity(videos.len());
    for video in videos {
        resolved.push(resolve_video(state.store().as_ref(), video).await?);
    }

    Ok(Json(resolved))
}

pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<Json<Video>, HttpAppError> {
    let video = find_video(&state, &video_id).await?;
    Ok(Json(resolve_video(state.store().as_ref(), video).await?))
}

/// Delete a video record. Stored assets are left in place.
pub async fn delete_video(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(video_id): Path<String>,
) -> Result<StatusCode, HttpAppError> {
    let video = find_video(&state, &video_id).await?;
    if !video.is_owned_by(auth.user_id) {
        return Err(AppError::Forbidden("You can't delete this video".to_string()).into());
    }

    state.videos.delete_video(video.id).await?;
    tracing::info!(video_id = %video.id, "Video deleted");

    Ok(StatusCode::NO_CONTENT)
}
