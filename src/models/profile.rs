use serde::{Deserialize, Serialize};

/// Birth profile supplied at profile setup and attached to fortune requests.
/// Field contents are shaped by serde here; deeper semantic validation
/// (date plausibility etc.) belongs to the profile-setup flow, not this API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: Option<String>,
    pub gender: Gender,
    pub birth_date: String,
    pub calendar_type: CalendarType,
    #[serde(default)]
    pub birth_time: BirthTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "남성",
            Gender::Female => "여성",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum CalendarType {
    Solar,
    Lunar,
}

impl CalendarType {
    pub fn label(&self) -> &'static str {
        match self {
            CalendarType::Solar => "양력",
            CalendarType::Lunar => "음력",
        }
    }
}

/// Traditional two-hour birth-time branches (시진). Clients that don't know
/// the birth time omit the field and get `Unknown`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BirthTime {
    Ja,
    Chuk,
    In,
    Myo,
    Jin,
    Sa,
    O,
    Mi,
    Sin,
    Yu,
    Sul,
    Hae,
    #[default]
    Unknown,
}

impl BirthTime {
    pub fn label(&self) -> &'static str {
        match self {
            BirthTime::Ja => "자시 (23:00~01:00)",
            BirthTime::Chuk => "축시 (01:00~03:00)",
            BirthTime::In => "인시 (03:00~05:00)",
            BirthTime::Myo => "묘시 (05:00~07:00)",
            BirthTime::Jin => "진시 (07:00~09:00)",
            BirthTime::Sa => "사시 (09:00~11:00)",
            BirthTime::O => "오시 (11:00~13:00)",
            BirthTime::Mi => "미시 (13:00~15:00)",
            BirthTime::Sin => "신시 (15:00~17:00)",
            BirthTime::Yu => "유시 (17:00~19:00)",
            BirthTime::Sul => "술시 (19:00~21:00)",
            BirthTime::Hae => "해시 (21:00~23:00)",
            BirthTime::Unknown => "모름",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_deserializes_camel_case() {
        let json = r#"{
            "name": "김지은",
            "gender": "female",
            "birthDate": "1990-05-01",
            "calendarType": "solar",
            "birthTime": "myo"
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.name.as_deref(), Some("김지은"));
        assert_eq!(profile.gender, Gender::Female);
        assert_eq!(profile.calendar_type, CalendarType::Solar);
        assert_eq!(profile.birth_time, BirthTime::Myo);
        assert!(profile.profile_image_url.is_none());
    }

    #[test]
    fn test_birth_time_defaults_to_unknown() {
        let json = r#"{
            "name": null,
            "gender": "male",
            "birthDate": "1985-11-20",
            "calendarType": "lunar"
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.birth_time, BirthTime::Unknown);
    }
}
