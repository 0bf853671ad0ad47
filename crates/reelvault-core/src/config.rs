//! Configuration module
//!
//! This module provides the process-wide configuration: server, authentication,
//! media tool and storage backend settings. Configuration is read once at startup,
//! validated, and never mutated afterwards.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    ACCESS_TOKEN_TTL_HOURS, ASSETS_ROUTE, INLINE_MAX_BYTES, MAX_THUMBNAIL_SIZE_BYTES,
    MAX_TOKEN_TTL_DAYS, MAX_VIDEO_SIZE_BYTES, MEDIA_TOOL_TIMEOUT_SECS, PRESIGNED_URL_TTL,
    REFRESH_TOKEN_TTL_DAYS,
};
use crate::storage_types::{StorageBackend, UrlPolicy};

/// URL policy for the object store backend, with the parameters that policy requires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UrlPolicyConfig {
    /// `https://{bucket}.s3.{region}.amazonaws.com/{key}`
    Public,
    /// `{base_url}/{bucket}/{key}`
    Localstack { base_url: String },
    /// Reference stored as `{bucket},{key}`, signed per read
    Presigned { expires_in: Duration },
    /// `https://{host}/{key}`
    Cloudfront { host: String },
}

impl UrlPolicyConfig {
    pub fn policy(&self) -> UrlPolicy {
        match self {
            UrlPolicyConfig::Public => UrlPolicy::Public,
            UrlPolicyConfig::Localstack { .. } => UrlPolicy::Localstack,
            UrlPolicyConfig::Presigned { .. } => UrlPolicy::Presigned,
            UrlPolicyConfig::Cloudfront { .. } => UrlPolicy::Cloudfront,
        }
    }
}

/// Object store (S3-compatible) configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectStoreConfig {
    pub bucket: String,
    pub region: String,
    pub policy: UrlPolicyConfig,
}

impl ObjectStoreConfig {
    /// Custom endpoint for S3-compatible emulators. Only the localstack policy sets one.
    pub fn endpoint(&self) -> Option<&str> {
        match &self.policy {
            UrlPolicyConfig::Localstack { base_url } => Some(base_url.as_str()),
            _ => None,
        }
    }
}

/// Storage backend selection plus the parameters of the selected backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageBackendConfig {
    Inline {
        max_bytes: u64,
    },
    Filesystem {
        assets_root: PathBuf,
        /// Public URL prefix the assets root is served under
        base_url: String,
    },
    ObjectStore(ObjectStoreConfig),
}

impl StorageBackendConfig {
    pub fn backend(&self) -> StorageBackend {
        match self {
            StorageBackendConfig::Inline { .. } => StorageBackend::Inline,
            StorageBackendConfig::Filesystem { .. } => StorageBackend::Filesystem,
            StorageBackendConfig::ObjectStore(_) => StorageBackend::ObjectStore,
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_url: String,
    pub port: u16,
    pub platform: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub access_token_ttl_hours: i64,
    pub refresh_token_ttl_days: i64,
    pub filepath_root: PathBuf,
    pub assets_root: PathBuf,
    pub staging_dir: PathBuf,
    pub storage: StorageBackendConfig,
    pub ffprobe_path: String,
    pub ffmpeg_path: String,
    /// 0 disables the timeout
    pub media_tool_timeout_secs: u64,
    pub max_thumbnail_size_bytes: u64,
    pub max_video_size_bytes: u64,
}

impl Config {
    /// Load configuration from the process environment (and `.env` if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source. Empty values count as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| anyhow::anyhow!("environment variable {} is not set", key))
        };
        let parse_or = |key: &str, default: u64| -> Result<u64, anyhow::Error> {
            match get(key) {
                Some(v) => v
                    .parse()
                    .map_err(|_| anyhow::anyhow!("{} must be a non-negative integer", key)),
                None => Ok(default),
            }
        };
        let parse_ttl = |key: &str, default: i64| -> Result<i64, anyhow::Error> {
            match get(key) {
                Some(v) => v
                    .parse()
                    .map_err(|_| anyhow::anyhow!("{} must be an integer", key)),
                None => Ok(default),
            }
        };

        let server_url = required("SERVER_URL")?.trim_end_matches('/').to_string();
        let port: u16 = required("PORT")?
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid port number"))?;
        let assets_root = PathBuf::from(required("ASSETS_ROOT")?);

        let backend: StorageBackend = required("ASSET_STORAGE")?.parse()?;
        let storage = match backend {
            StorageBackend::Inline => StorageBackendConfig::Inline {
                max_bytes: parse_or("INLINE_MAX_BYTES", INLINE_MAX_BYTES)?,
            },
            StorageBackend::Filesystem => StorageBackendConfig::Filesystem {
                assets_root: assets_root.clone(),
                base_url: format!("{}:{}{}", server_url, port, ASSETS_ROUTE),
            },
            StorageBackend::ObjectStore => {
                let policy: UrlPolicy = required("S3_URL_MODE")?.parse()?;
                let policy = match policy {
                    UrlPolicy::Public => UrlPolicyConfig::Public,
                    UrlPolicy::Localstack => UrlPolicyConfig::Localstack {
                        base_url: required("LOCALSTACK_URL")?
                            .trim_end_matches('/')
                            .to_string(),
                    },
                    UrlPolicy::Presigned => UrlPolicyConfig::Presigned {
                        expires_in: PRESIGNED_URL_TTL,
                    },
                    UrlPolicy::Cloudfront => UrlPolicyConfig::Cloudfront {
                        host: required("S3_CF_DISTRO")?
                            .trim_start_matches("https://")
                            .trim_end_matches('/')
                            .to_string(),
                    },
                };
                StorageBackendConfig::ObjectStore(ObjectStoreConfig {
                    bucket: required("S3_BUCKET")?,
                    region: required("S3_REGION")?,
                    policy,
                })
            }
        };

        let staging_dir = get("STAGING_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join("reelvault-staging"));

        let config = Config {
            server_url,
            port,
            platform: get("PLATFORM").unwrap_or_else(|| "prod".to_string()),
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            access_token_ttl_hours: parse_ttl("ACCESS_TOKEN_TTL_HOURS", ACCESS_TOKEN_TTL_HOURS)?,
            refresh_token_ttl_days: parse_ttl("REFRESH_TOKEN_TTL_DAYS", REFRESH_TOKEN_TTL_DAYS)?,
            filepath_root: PathBuf::from(required("FILEPATH_ROOT")?),
            assets_root,
            staging_dir,
            storage,
            ffprobe_path: get("FFPROBE_PATH").unwrap_or_else(|| "ffprobe".to_string()),
            ffmpeg_path: get("FFMPEG_PATH").unwrap_or_else(|| "ffmpeg".to_string()),
            media_tool_timeout_secs: parse_or("MEDIA_TOOL_TIMEOUT_SECS", MEDIA_TOOL_TIMEOUT_SECS)?,
            max_thumbnail_size_bytes: parse_or(
                "MAX_THUMBNAIL_SIZE_BYTES",
                MAX_THUMBNAIL_SIZE_BYTES,
            )?,
            max_video_size_bytes: parse_or("MAX_VIDEO_SIZE_BYTES", MAX_VIDEO_SIZE_BYTES)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !self.database_url.starts_with("sqlite:") {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid SQLite connection string"
            ));
        }

        if self.max_thumbnail_size_bytes == 0 || self.max_video_size_bytes == 0 {
            return Err(anyhow::anyhow!("upload size ceilings must be greater than zero"));
        }

        if !(1..=MAX_TOKEN_TTL_DAYS * 24).contains(&self.access_token_ttl_hours) {
            return Err(anyhow::anyhow!(
                "ACCESS_TOKEN_TTL_HOURS must be between 1 and {}",
                MAX_TOKEN_TTL_DAYS * 24
            ));
        }

        if !(1..=MAX_TOKEN_TTL_DAYS).contains(&self.refresh_token_ttl_days) {
            return Err(anyhow::anyhow!(
                "REFRESH_TOKEN_TTL_DAYS must be between 1 and {}",
                MAX_TOKEN_TTL_DAYS
            ));
        }

        match &self.storage {
            StorageBackendConfig::Inline { max_bytes } if *max_bytes == 0 => Err(
                anyhow::anyhow!("INLINE_MAX_BYTES must be greater than zero"),
            ),
            StorageBackendConfig::ObjectStore(os) if os.bucket.contains(',') => Err(
                anyhow::anyhow!("S3_BUCKET must not contain ','"),
            ),
            _ => Ok(()),
        }
    }

    /// Check if the application is running with development-only endpoints enabled
    pub fn is_dev(&self) -> bool {
        self.platform.eq_ignore_ascii_case("dev")
    }

    pub fn media_tool_timeout(&self) -> Option<Duration> {
        match self.media_tool_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
