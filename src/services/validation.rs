use crate::errors::AppError;
use crate::models::{
    CompatibilityPayload, DailyFortunePayload, DirectFortunePayload, FortuneRequest,
    TopicFortunePayload, UserProfile,
};

/// Pure per-endpoint validators. Each returns the first missing field it
/// encounters, in declared order, without touching the provider or database.
/// Whitespace-only values count as missing.

fn required(field: &'static str, value: Option<String>) -> Result<String, AppError> {
    match value {
        Some(v) => {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                Err(AppError::MissingField(field))
            } else {
                Ok(trimmed.to_string())
            }
        }
        None => Err(AppError::MissingField(field)),
    }
}

fn optional_name(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// POST /fortune: concern is checked before the detail levels.
pub fn validate_topic(payload: TopicFortunePayload) -> Result<FortuneRequest, AppError> {
    let concern = required("concern", payload.concern)?;
    let detail_level1 = required("detailLevel1", payload.detail_level1)?;
    let detail_level2 = required("detailLevel2", payload.detail_level2)?;
    let detail_level3 = required("detailLevel3", payload.detail_level3)?;

    Ok(FortuneRequest::TopicConcern {
        concern,
        detail_level1,
        detail_level2,
        detail_level3,
        user_name: optional_name(payload.user_name),
        profile: payload.user_profile,
    })
}

/// POST /fortune/direct: a single non-empty free-form question.
pub fn validate_direct(payload: DirectFortunePayload) -> Result<FortuneRequest, AppError> {
    let user_query = required("userQuery", payload.user_query)?;

    Ok(FortuneRequest::DirectQuestion {
        user_query,
        user_name: optional_name(payload.user_name),
        profile: payload.user_profile,
    })
}

/// POST /fortune/daily: the profile object must be present. Its inner
/// fields are already shaped by deserialization; deep validation of birth
/// data happens at profile setup, not here.
pub fn validate_daily(payload: DailyFortunePayload) -> Result<FortuneRequest, AppError> {
    let profile = payload
        .user_profile
        .ok_or(AppError::MissingField("userProfile"))?;

    Ok(FortuneRequest::Daily {
        user_name: optional_name(payload.user_name),
        profile,
    })
}

/// POST /compatibility: both profiles must be present.
pub fn validate_compatibility(payload: CompatibilityPayload) -> Result<FortuneRequest, AppError> {
    let first: UserProfile = payload
        .first_profile
        .ok_or(AppError::MissingField("firstProfile"))?;
    let second: UserProfile = payload
        .second_profile
        .ok_or(AppError::MissingField("secondProfile"))?;

    Ok(FortuneRequest::Compatibility { first, second })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BirthTime, CalendarType, Gender};

    fn topic_payload() -> TopicFortunePayload {
        TopicFortunePayload {
            concern: Some("이직".to_string()),
            detail_level1: Some("IT 업계".to_string()),
            detail_level2: Some("연봉 협상".to_string()),
            detail_level3: Some("올해 안에 가능할지".to_string()),
            user_name: Some("지은".to_string()),
            user_profile: None,
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            name: Some("지은".to_string()),
            gender: Gender::Female,
            birth_date: "1990-05-01".to_string(),
            calendar_type: CalendarType::Solar,
            birth_time: BirthTime::Unknown,
            profile_image_url: None,
        }
    }

    #[test]
    fn test_valid_topic_payload_normalizes() {
        let request = validate_topic(topic_payload()).unwrap();
        match request {
            FortuneRequest::TopicConcern { concern, .. } => assert_eq!(concern, "이직"),
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_missing_concern_wins_over_missing_details() {
        let payload = TopicFortunePayload {
            concern: None,
            detail_level1: None,
            detail_level2: None,
            detail_level3: None,
            user_name: None,
            user_profile: None,
        };

        match validate_topic(payload) {
            Err(AppError::MissingField(field)) => assert_eq!(field, "concern"),
            other => panic!("expected missing concern, got {:?}", other),
        }
    }

    #[test]
    fn test_detail_levels_checked_in_order() {
        let mut payload = topic_payload();
        payload.detail_level2 = Some("   ".to_string());
        payload.detail_level3 = None;

        match validate_topic(payload) {
            Err(AppError::MissingField(field)) => assert_eq!(field, "detailLevel2"),
            other => panic!("expected missing detailLevel2, got {:?}", other),
        }
    }

    #[test]
    fn test_values_are_trimmed() {
        let mut payload = topic_payload();
        payload.concern = Some("  이직  ".to_string());

        match validate_topic(payload).unwrap() {
            FortuneRequest::TopicConcern { concern, .. } => assert_eq!(concern, "이직"),
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_direct_requires_query() {
        let payload = DirectFortunePayload {
            user_query: Some("".to_string()),
            user_name: None,
            user_profile: None,
        };

        match validate_direct(payload) {
            Err(AppError::MissingField(field)) => assert_eq!(field, "userQuery"),
            other => panic!("expected missing userQuery, got {:?}", other),
        }
    }

    #[test]
    fn test_daily_requires_profile() {
        let payload = DailyFortunePayload {
            user_name: Some("지은".to_string()),
            user_profile: None,
        };

        match validate_daily(payload) {
            Err(AppError::MissingField(field)) => assert_eq!(field, "userProfile"),
            other => panic!("expected missing userProfile, got {:?}", other),
        }
    }

    #[test]
    fn test_compatibility_requires_both_profiles() {
        let payload = CompatibilityPayload {
            first_profile: Some(profile()),
            second_profile: None,
        };

        match validate_compatibility(payload) {
            Err(AppError::MissingField(field)) => assert_eq!(field, "secondProfile"),
            other => panic!("expected missing secondProfile, got {:?}", other),
        }
    }
}
