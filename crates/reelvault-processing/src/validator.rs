/// Validation errors for inbound assets
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing media type")]
    MissingMediaType,

    #[error("Unsupported media type: {media_type} (allowed: {allowed:?})")]
    UnsupportedMediaType {
        media_type: String,
        allowed: &'static [&'static str],
    },

    #[error("Payload too large: exceeds {max} bytes")]
    PayloadTooLarge { max: u64 },

    #[error("Empty file")]
    EmptyPayload,
}

const THUMBNAIL_MEDIA_TYPES: &[&str] = &["image/jpeg", "image/png"];
const VIDEO_MEDIA_TYPES: &[&str] = &["video/mp4"];

/// The two kinds of asset a video record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Thumbnail,
    Video,
}

impl AssetKind {
    pub fn allowed_media_types(&self) -> &'static [&'static str] {
        match self {
            AssetKind::Thumbnail => THUMBNAIL_MEDIA_TYPES,
            AssetKind::Video => VIDEO_MEDIA_TYPES,
        }
    }

    /// Validate a declared media type and return its normalized form.
    pub fn validate_media_type(&self, declared: Option<&str>) -> Result<String, ValidationError> {
        let normalized = declared
            .map(normalize_media_type)
            .filter(|mt| !mt.is_empty())
            .ok_or(ValidationError::MissingMediaType)?;

        let allowed = self.allowed_media_types();
        if !allowed.contains(&normalized.as_str()) {
            return Err(ValidationError::UnsupportedMediaType {
                media_type: normalized,
                allowed,
            });
        }

        Ok(normalized)
    }
}

/// Strip parameters and lowercase: `Image/PNG; charset=binary` becomes `image/png`.
pub fn normalize_media_type(raw: &str) -> String {
    raw.split(';').next().unwrap_or("").trim().to_lowercase()
}
