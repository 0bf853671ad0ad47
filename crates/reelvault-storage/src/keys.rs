//! Shared key generation for storage backends.
//!
//! Key format: `{name}.{ext}`, or `{prefix}/{name}.{ext}` when a classification prefix is
//! supplied. `name` is 32 random bytes, URL-safe base64 without padding.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;

const NAME_BYTES: usize = 32;

/// Collision-resistant opaque names for stored objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomNamer;

impl RandomNamer {
    /// 43-character URL-safe name from the thread-local CSPRNG.
    pub fn name(&self) -> String {
        let mut bytes = [0u8; NAME_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Generate a storage key for an asset of `media_type`.
    pub fn key(&self, media_type: &str, prefix: Option<&str>) -> String {
        let file = format!("{}.{}", self.name(), extension_for(media_type));
        match prefix {
            Some(prefix) => format!("{}/{}", prefix.trim_matches('/'), file),
            None => file,
        }
    }
}

/// File extension for a `type/subtype` media type: the subtype, or `bin`.
pub fn extension_for(media_type: &str) -> &str {
    match media_type.split_once('/') {
        Some((_, subtype)) if !subtype.is_empty() => subtype,
        _ => "bin",
    }
}
