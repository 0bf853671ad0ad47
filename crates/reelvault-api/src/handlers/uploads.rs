//! Thumbnail and video upload handlers.
//!
//! The file field is streamed straight into the ingestion pipeline. The video record is
//! updated only after the asset store has accepted the asset.

use crate::auth::AuthUser;
use crate::constants::{THUMBNAIL_FIELD, VIDEO_FIELD};
use crate::error::HttpAppError;
use crate::handlers::videos::{find_video, resolve_video};
use crate::state::AppState;
use crate::utils::upload::{field_reader, loggable_reference, missing_field, multipart_error};
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use reelvault_core::models::Video;
use reelvault_core::AppError;
use reelvault_processing::AssetKind;
use std::sync::Arc;

pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(video_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Video>, HttpAppError> {
    upload_asset(&state, auth, &video_id, AssetKind::Thumbnail, multipart).await
}

pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(video_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Video>, HttpAppError> {
    upload_asset(&state, auth, &video_id, AssetKind::Video, multipart).await
}

#[tracing::instrument(skip(state, auth, multipart), fields(user_id = %auth.user_id))]
async fn upload_asset(
    state: &AppState,
    auth: AuthUser,
    video_id: &str,
    kind: AssetKind,
    mut multipart: Multipart,
) -> Result<Json<Video>, HttpAppError> {
    let video = find_video(state, video_id).await?;
    if !video.is_owned_by(auth.user_id) {
        return Err(AppError::Unauthorized(
            "You do not have permission to upload to this video".to_string(),
        )
        .into());
    }

    let field_name = match kind {
        AssetKind::Thumbnail => THUMBNAIL_FIELD,
        AssetKind::Video => VIDEO_FIELD,
    };

    let mut reference = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(field_name) {
            continue;
        }
        let declared = field.content_type().map(str::to_owned);
        reference = Some(
            state
                .pipeline
                .ingest(kind, declared.as_deref(), field_reader(field))
                .await?,
        );
        break;
    }
    let reference = reference.ok_or_else(|| missing_field(field_name))?.to_string();

    let updated = match kind {
        AssetKind::Thumbnail => state.videos.update_thumbnail_url(video.id, &reference).await,
        AssetKind::Video => state.videos.update_video_url(video.id, &reference).await,
    };
    let updated = updated.inspect_err(|e| {
        tracing::error!(
            error = %e,
            video_id = %video.id,
            reference = %loggable_reference(&reference),
            "Asset stored but video record update failed; stored asset is orphaned"
        );
    })?;

    Ok(Json(resolve_video(state.store().as_ref(), updated).await?))
}
