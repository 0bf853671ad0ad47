use std::fmt::{Display, Formatter, Result as FmtResult};

/// Durable output of [`crate::AssetStore::save`].
///
/// Stored in the metadata record via its `Display` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetReference {
    /// URL usable as-is (`data:`, filesystem, public/localstack/cloudfront object URLs)
    Url(String),
    /// Presigned policy: only the location is persisted, as `{bucket},{key}`
    ObjectKey { bucket: String, key: String },
}

impl AssetReference {
    /// Parse a stored `{bucket},{key}` reference.
    ///
    /// Returns `None` for anything that looks like a URL, or when either half is empty.
    pub fn parse_object_key(stored: &str) -> Option<(&str, &str)> {
        if stored.contains("://") || stored.starts_with("data:") {
            return None;
        }
        match stored.split_once(',') {
            Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => Some((bucket, key)),
            _ => None,
        }
    }
}

impl Display for AssetReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AssetReference::Url(url) => write!(f, "{}", url),
            AssetReference::ObjectKey { bucket, key } => write!(f, "{},{}", bucket, key),
        }
    }
}

impl From<AssetReference> for String {
    fn from(reference: AssetReference) -> Self {
        reference.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_stored_form() {
        let reference = AssetReference::ObjectKey {
            bucket: "media".to_string(),
            key: "landscape/abc.mp4".to_string(),
        };
        let stored = reference.to_string();
        assert_eq!(stored, "media,landscape/abc.mp4");
        assert_eq!(
            AssetReference::parse_object_key(&stored),
            Some(("media", "landscape/abc.mp4"))
        );
    }

    #[test]
    fn test_urls_are_not_object_keys() {
        assert_eq!(
            AssetReference::parse_object_key("data:image/png;base64,iVBORw0KGgo="),
            None
        );
        assert_eq!(
            AssetReference::parse_object_key("https://cdn.example.com/a,b.png"),
            None
        );
        assert_eq!(AssetReference::parse_object_key(",key.mp4"), None);
        assert_eq!(AssetReference::parse_object_key("no-separator"), None);
    }
}
