use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Video metadata record.
///
/// `thumbnail_url` and `video_url` hold the asset reference produced at ingestion. For the
/// presigned object-store policy that reference is `{bucket},{key}` and must be resolved
/// before it is returned to a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Video {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub user_id: Uuid,
}

impl Video {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateVideoParams {
    pub title: String,
    #[serde(default)]
    pub description: String,
}
