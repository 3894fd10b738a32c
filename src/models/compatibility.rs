use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::UserProfile;

/// Raw body of POST /compatibility.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityPayload {
    pub first_profile: Option<UserProfile>,
    pub second_profile: Option<UserProfile>,
}

/// Persisted compatibility result, shareable by token without auth.
/// Read-only after insert.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityRecord {
    pub id: Uuid,
    pub share_token: String,
    pub first_name: String,
    pub second_name: String,
    pub result_text: String,
    pub created_at: DateTime<Utc>,
}

/// Input for persisting a freshly generated compatibility result.
#[derive(Debug, Clone)]
pub struct CreateCompatibilityRecord {
    pub share_token: String,
    pub first_name: String,
    pub second_name: String,
    pub result_text: String,
}

/// Payload of a successful POST /compatibility.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityResult {
    pub compatibility: String,
    pub share_token: String,
}
