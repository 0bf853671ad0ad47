use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage backend types
///
/// Selects which asset store persists uploaded bytes. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Bytes embedded in the metadata record as a `data:` URL
    Inline,
    Filesystem,
    ObjectStore,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inline" => Ok(StorageBackend::Inline),
            "filesystem" => Ok(StorageBackend::Filesystem),
            "objectstore" => Ok(StorageBackend::ObjectStore),
            _ => Err(anyhow::anyhow!(
                "Invalid storage backend: {} (expected inline, filesystem or objectstore)",
                s
            )),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::Inline => write!(f, "inline"),
            StorageBackend::Filesystem => write!(f, "filesystem"),
            StorageBackend::ObjectStore => write!(f, "objectstore"),
        }
    }
}

/// URL-generation policy for the object store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlPolicy {
    Public,
    Localstack,
    Presigned,
    Cloudfront,
}

impl FromStr for UrlPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(UrlPolicy::Public),
            "localstack" => Ok(UrlPolicy::Localstack),
            "presigned" => Ok(UrlPolicy::Presigned),
            "cloudfront" => Ok(UrlPolicy::Cloudfront),
            _ => Err(anyhow::anyhow!(
                "Invalid S3 URL mode: {} (expected public, localstack, presigned or cloudfront)",
                s
            )),
        }
    }
}

impl Display for UrlPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UrlPolicy::Public => write!(f, "public"),
            UrlPolicy::Localstack => write!(f, "localstack"),
            UrlPolicy::Presigned => write!(f, "presigned"),
            UrlPolicy::Cloudfront => write!(f, "cloudfront"),
        }
    }
}
