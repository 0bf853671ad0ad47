//! ReelVault Storage Library
//!
//! This crate provides the `AssetStore` abstraction and its three implementations:
//! inline (`data:` URLs kept in the metadata record), local filesystem, and an
//! S3-compatible object store with four URL policies.
//!
//! # Storage key format
//!
//! Keys are generated by [`RandomNamer`]: `{name}.{ext}` for thumbnails and
//! `{classification}/{name}.{ext}` for videos. Keys must not contain `..` or a leading `/`.

pub mod factory;
pub mod inline;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod reference;
#[cfg(feature = "storage-objectstore")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_asset_store;
pub use inline::InlineStore;
pub use keys::RandomNamer;
#[cfg(feature = "storage-local")]
pub use local::FilesystemStore;
pub use reelvault_core::StorageBackend;
pub use reference::AssetReference;
#[cfg(feature = "storage-objectstore")]
pub use s3::ObjectStoreAssets;
pub use traits::{AssetReader, AssetStore, StorageError, StorageResult};
