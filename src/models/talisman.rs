use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored talisman image reference. The image itself is produced by the
/// external image-generation collaborator; this side only records the result.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Talisman {
    pub id: Uuid,
    pub user_id: String,
    pub concern: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// Body of POST /talisman.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTalisman {
    pub user_id: Option<String>,
    pub concern: Option<String>,
    pub image_url: Option<String>,
}

/// Body of GET /talisman/user.
#[derive(Debug, Clone, Serialize)]
pub struct TalismanList {
    pub talismans: Vec<Talisman>,
}
