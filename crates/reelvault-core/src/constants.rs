//! Shared constants.

use std::time::Duration;

/// Default ceiling for thumbnail uploads (10 MiB).
pub const MAX_THUMBNAIL_SIZE_BYTES: u64 = 10 << 20;

/// Default ceiling for video uploads (1 GiB).
pub const MAX_VIDEO_SIZE_BYTES: u64 = 1 << 30;

/// Default ceiling for any asset when the inline backend is active.
pub const INLINE_MAX_BYTES: u64 = 10 << 20;

/// Validity window of presigned read URLs.
pub const PRESIGNED_URL_TTL: Duration = Duration::from_secs(15 * 60);

/// Default timeout for ffprobe/ffmpeg invocations.
pub const MEDIA_TOOL_TIMEOUT_SECS: u64 = 300;

pub const ACCESS_TOKEN_TTL_HOURS: i64 = 24 * 30;
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 60;

/// Upper bound for configured token lifetimes (ten years).
pub const MAX_TOKEN_TTL_DAYS: i64 = 3650;

/// Lifetime of access tokens minted from a refresh token.
pub const REFRESHED_ACCESS_TOKEN_TTL_HOURS: i64 = 1;

/// Route prefix for the public asset directory.
pub const ASSETS_ROUTE: &str = "/assets";
