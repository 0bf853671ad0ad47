//! ReelVault Core Library
//!
//! This crate provides core domain models, error types, and configuration
//! that are shared across all ReelVault components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, ObjectStoreConfig, StorageBackendConfig, UrlPolicyConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::{StorageBackend, UrlPolicy};
