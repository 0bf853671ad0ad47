//! API-specific constants

pub const API_PREFIX: &str = "/api";

/// Multipart framing allowance added on top of each upload ceiling for the body limit.
/// The ingestion pipeline enforces the exact ceiling on the file field itself.
pub const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;

pub const THUMBNAIL_FIELD: &str = "thumbnail";
pub const VIDEO_FIELD: &str = "video";

pub const JWT_ISSUER: &str = "reelvault-access";

/// Random bytes in a refresh token before hex encoding
pub const REFRESH_TOKEN_BYTES: usize = 32;
