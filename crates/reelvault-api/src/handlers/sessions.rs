//! Login, access-token refresh and refresh-token revocation.

use crate::auth::jwt::make_access_token;
use crate::auth::password::verify_password;
use crate::auth::tokens::{bearer_token, generate_refresh_token};
use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::{Duration, Utc};
use reelvault_core::constants::REFRESHED_ACCESS_TOKEN_TTL_HOURS;
use reelvault_core::models::User;
use reelvault_core::AppError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub token: String,
}

fn bad_credentials() -> AppError {
    AppError::Unauthorized("Incorrect email or password".to_string())
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpAppError> {
    let user = state
        .users
        .get_user_by_email(request.email.trim())
        .await?
        .ok_or_else(bad_credentials)?;

    if !verify_password(&request.password, &user.password)? {
        return Err(bad_credentials().into());
    }

    let token = make_access_token(
        user.id,
        &state.config.jwt_secret,
        Duration::hours(state.config.access_token_ttl_hours),
    )?;

    let refresh_token = generate_refresh_token();
    state
        .refresh_tokens
        .create_token(
            &refresh_token,
            user.id,
            Utc::now() + Duration::days(state.config.refresh_token_ttl_days),
        )
        .await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        user,
        token,
        refresh_token,
    }))
}

/// Exchange an active refresh token for a short-lived access token.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<RefreshResponse>, HttpAppError> {
    let refresh_token = bearer_token(&headers)?;

    let stored = state
        .refresh_tokens
        .get_active_token(refresh_token)
        .await?
        .ok_or_else(|| {
            AppError::Unauthorized("Couldn't get user for refresh token".to_string())
        })?;

    let token = make_access_token(
        stored.user_id,
        &state.config.jwt_secret,
        Duration::hours(REFRESHED_ACCESS_TOKEN_TTL_HOURS),
    )?;

    Ok(Json(RefreshResponse { token }))
}

pub async fn revoke(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode, HttpAppError> {
    let refresh_token = bearer_token(&headers)?;

    if !state.refresh_tokens.revoke_token(refresh_token).await? {
        tracing::debug!("Revoke requested for unknown refresh token");
    }

    Ok(StatusCode::NO_CONTENT)
}
