//! Route configuration and setup

use crate::constants::{API_PREFIX, MULTIPART_OVERHEAD_BYTES};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE},
        HeaderName, HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use reelvault_core::constants::ASSETS_ROUTE;
use reelvault_processing::AssetKind;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Router {
    let filepath_root = state.config.filepath_root.clone();
    let assets_root = state.config.assets_root.clone();

    let api = Router::new()
        .merge(session_routes())
        .merge(video_routes())
        .merge(upload_routes(&state))
        .route("/admin/reset", post(handlers::admin::reset))
        .route("/health", get(handlers::health::health_check))
        .with_state(state);

    // Filesystem-backed assets change under the same URL when re-uploaded
    let assets = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .service(ServeDir::new(assets_root));

    api.nest_service("/app", ServeDir::new(filepath_root))
        .nest_service(ASSETS_ROUTE, assets)
        .layer(TraceLayer::new_for_http())
        .layer(setup_cors())
}

fn setup_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .allow_headers([
            ACCEPT,
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
        ])
}

fn session_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/users", API_PREFIX),
            post(handlers::users::create_user),
        )
        .route(
            &format!("{}/login", API_PREFIX),
            post(handlers::sessions::login),
        )
        .route(
            &format!("{}/refresh", API_PREFIX),
            post(handlers::sessions::refresh),
        )
        .route(
            &format!("{}/revoke", API_PREFIX),
            post(handlers::sessions::revoke),
        )
}

fn video_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/videos", API_PREFIX),
            get(handlers::videos::list_videos).post(handlers::videos::create_video),
        )
        .route(
            &format!("{}/videos/{{videoID}}", API_PREFIX),
            get(handlers::videos::get_video).delete(handlers::videos::delete_video),
        )
}

/// Upload routes carry a body limit slightly above the effective ceiling, so an
/// oversized file is still reported by the pipeline as `PayloadTooLarge`.
fn upload_routes(state: &AppState) -> Router<Arc<AppState>> {
    let body_limit = |kind: AssetKind| {
        let limit = state
            .pipeline
            .ceiling(kind)
            .saturating_add(MULTIPART_OVERHEAD_BYTES);
        DefaultBodyLimit::max(usize::try_from(limit).unwrap_or(usize::MAX))
    };

    Router::new()
        .route(
            &format!("{}/thumbnail_upload/{{videoID}}", API_PREFIX),
            post(handlers::uploads::upload_thumbnail).layer(body_limit(AssetKind::Thumbnail)),
        )
        .route(
            &format!("{}/video_upload/{{videoID}}", API_PREFIX),
            post(handlers::uploads::upload_video).layer(body_limit(AssetKind::Video)),
        )
}
