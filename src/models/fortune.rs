use serde::{Deserialize, Serialize};

use crate::models::UserProfile;

/// Raw body of POST /fortune. Everything optional so the validator, not
/// serde, decides which field is reported missing first.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicFortunePayload {
    pub concern: Option<String>,
    pub detail_level1: Option<String>,
    pub detail_level2: Option<String>,
    pub detail_level3: Option<String>,
    pub user_name: Option<String>,
    pub user_profile: Option<UserProfile>,
}

/// Raw body of POST /fortune/direct.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectFortunePayload {
    pub user_query: Option<String>,
    pub user_name: Option<String>,
    pub user_profile: Option<UserProfile>,
}

/// Raw body of POST /fortune/daily.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyFortunePayload {
    pub user_name: Option<String>,
    pub user_profile: Option<UserProfile>,
}

/// A validated fortune request. Each variant carries exactly what its
/// prompt template interpolates.
#[derive(Debug, Clone)]
pub enum FortuneRequest {
    Daily {
        user_name: Option<String>,
        profile: UserProfile,
    },
    TopicConcern {
        concern: String,
        detail_level1: String,
        detail_level2: String,
        detail_level3: String,
        user_name: Option<String>,
        profile: Option<UserProfile>,
    },
    DirectQuestion {
        user_query: String,
        user_name: Option<String>,
        profile: Option<UserProfile>,
    },
    Compatibility {
        first: UserProfile,
        second: UserProfile,
    },
}

impl FortuneRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            FortuneRequest::Daily { .. } => "daily",
            FortuneRequest::TopicConcern { .. } => "topic",
            FortuneRequest::DirectQuestion { .. } => "direct",
            FortuneRequest::Compatibility { .. } => "compatibility",
        }
    }
}

/// Daily fortune reshaped from provider output. All fields required:
/// a response the provider half-filled is a provider error, not a fortune.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyFortune {
    pub overview: String,
    pub wealth: String,
    pub love: String,
    pub health: String,
    pub lucky_item: String,
    pub lucky_color: String,
    pub advice: String,
}

/// Body of a successful POST /fortune or /fortune/direct.
#[derive(Debug, Clone, Serialize)]
pub struct FortuneText {
    pub fortune: String,
}

/// Uniform success envelope for data-shaped endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct DataEnvelope<T> {
    pub error: bool,
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self { error: false, data }
    }
}
