use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode};
use reelvault_core::AppError;
use std::sync::Arc;

/// Wipe all users, tokens and videos. Only available when `PLATFORM=dev`.
pub async fn reset(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, &'static str), HttpAppError> {
    if !state.config.is_dev() {
        return Err(AppError::Forbidden(
            "Reset is only allowed in dev environment.".to_string(),
        )
        .into());
    }

    reelvault_db::reset_database(&state.pool).await?;
    tracing::warn!("Database reset to initial state");

    Ok((StatusCode::OK, "Database reset to initial state"))
}
