use crate::models::{FortuneRequest, UserProfile};

/// Assembles the provider prompt for a validated request. One fixed template
/// per request kind; interpolation only, no randomness and no timestamps, so
/// identical input always produces byte-identical text. The orchestrator's
/// response cache depends on that.
pub fn build(request: &FortuneRequest) -> String {
    match request {
        FortuneRequest::Daily { user_name, profile } => {
            build_daily(display_name(user_name.as_deref(), Some(profile)), profile)
        }
        FortuneRequest::TopicConcern {
            concern,
            detail_level1,
            detail_level2,
            detail_level3,
            user_name,
            profile,
        } => build_topic(
            display_name(user_name.as_deref(), profile.as_ref()),
            profile.as_ref(),
            concern,
            [detail_level1, detail_level2, detail_level3].map(String::as_str),
        ),
        FortuneRequest::DirectQuestion {
            user_query,
            user_name,
            profile,
        } => build_direct(
            display_name(user_name.as_deref(), profile.as_ref()),
            profile.as_ref(),
            user_query,
        ),
        FortuneRequest::Compatibility { first, second } => build_compatibility(first, second),
    }
}

/// Explicit user name first, then the profile name, then the guest
/// placeholder.
fn display_name<'a>(user_name: Option<&'a str>, profile: Option<&'a UserProfile>) -> &'a str {
    user_name
        .or_else(|| profile.and_then(|p| p.name.as_deref()))
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("게스트")
}

fn render_profile(profile: Option<&UserProfile>) -> String {
    match profile {
        Some(p) => format!(
            "이름: {}\n성별: {}\n생년월일: {} ({})\n태어난 시각: {}",
            p.name.as_deref().map(str::trim).filter(|n| !n.is_empty()).unwrap_or("게스트"),
            p.gender.label(),
            p.birth_date.trim(),
            p.calendar_type.label(),
            p.birth_time.label(),
        ),
        None => "프로필: 미상".to_string(),
    }
}

fn build_daily(name: &str, profile: &UserProfile) -> String {
    format!(
        r#"당신은 사주 명리학에 능한 운세 상담가입니다. 아래 사주 정보를 바탕으로 {name}님의 오늘의 운세를 봐주세요.

[사주 정보]
{profile}

응답은 반드시 아래 형식의 JSON으로만 작성하세요. 다른 텍스트는 넣지 마세요.
{{
  "overview": "오늘의 총운 (2~3문장)",
  "wealth": "재물운 (1~2문장)",
  "love": "애정운 (1~2문장)",
  "health": "건강운 (1~2문장)",
  "luckyItem": "오늘의 행운 아이템",
  "luckyColor": "오늘의 행운 색",
  "advice": "오늘의 조언 한 마디"
}}"#,
        name = name,
        profile = render_profile(Some(profile)),
    )
}

fn build_topic(name: &str, profile: Option<&UserProfile>, concern: &str, details: [&str; 3]) -> String {
    format!(
        r#"당신은 사주 명리학에 능한 운세 상담가입니다. {name}님이 아래 고민에 대한 운세 상담을 요청했습니다.

[사주 정보]
{profile}

[고민]
{concern}

[상세 내용]
1. {d1}
2. {d2}
3. {d3}

고민에 공감하며, 사주 정보를 근거로 현실적인 조언을 담아 따뜻한 말투로 답해주세요. 답변은 4~6문장으로 해주세요."#,
        name = name,
        profile = render_profile(profile),
        concern = concern.trim(),
        d1 = details[0].trim(),
        d2 = details[1].trim(),
        d3 = details[2].trim(),
    )
}

fn build_direct(name: &str, profile: Option<&UserProfile>, user_query: &str) -> String {
    format!(
        r#"당신은 사주 명리학에 능한 운세 상담가입니다. {name}님의 질문에 운세 상담가로서 답해주세요.

[사주 정보]
{profile}

[질문]
{query}

사주 정보를 근거로 구체적으로, 따뜻한 말투로 4~6문장 안에 답해주세요."#,
        name = name,
        profile = render_profile(profile),
        query = user_query.trim(),
    )
}

fn build_compatibility(first: &UserProfile, second: &UserProfile) -> String {
    format!(
        r#"당신은 사주 명리학에 능한 운세 상담가입니다. 아래 두 사람의 사주 궁합을 봐주세요.

[첫 번째 사람]
{first}

[두 번째 사람]
{second}

두 사람의 성향이 어떻게 맞물리는지, 관계에서 주의할 점과 좋은 점을 균형 있게 담아 6~8문장으로 답해주세요. 마지막 문장에는 100점 만점 궁합 점수를 넣어주세요."#,
        first = render_profile(Some(first)),
        second = render_profile(Some(second)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BirthTime, CalendarType, Gender};

    fn profile(name: Option<&str>) -> UserProfile {
        UserProfile {
            name: name.map(str::to_string),
            gender: Gender::Female,
            birth_date: "1990-05-01".to_string(),
            calendar_type: CalendarType::Solar,
            birth_time: BirthTime::Myo,
            profile_image_url: None,
        }
    }

    fn topic_request() -> FortuneRequest {
        FortuneRequest::TopicConcern {
            concern: "이직".to_string(),
            detail_level1: "IT 업계".to_string(),
            detail_level2: "연봉 협상".to_string(),
            detail_level3: "올해 안에 가능할지".to_string(),
            user_name: Some("지은".to_string()),
            profile: None,
        }
    }

    #[test]
    fn test_topic_prompt_contains_all_fields_once_in_order() {
        let prompt = build(&topic_request());

        for value in ["이직", "IT 업계", "연봉 협상", "올해 안에 가능할지"] {
            assert_eq!(prompt.matches(value).count(), 1, "expected {} once", value);
        }

        let concern_pos = prompt.find("이직").unwrap();
        let d1_pos = prompt.find("IT 업계").unwrap();
        let d2_pos = prompt.find("연봉 협상").unwrap();
        let d3_pos = prompt.find("올해 안에 가능할지").unwrap();
        assert!(concern_pos < d1_pos && d1_pos < d2_pos && d2_pos < d3_pos);
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(build(&topic_request()), build(&topic_request()));
    }

    #[test]
    fn test_guest_placeholder_when_name_absent() {
        let request = FortuneRequest::DirectQuestion {
            user_query: "올해 운세가 궁금해요".to_string(),
            user_name: None,
            profile: None,
        };

        let prompt = build(&request);
        assert!(prompt.contains("게스트"));
        assert!(prompt.contains("프로필: 미상"));
    }

    #[test]
    fn test_profile_name_used_when_user_name_absent() {
        let request = FortuneRequest::Daily {
            user_name: None,
            profile: profile(Some("지은")),
        };

        let prompt = build(&request);
        assert!(prompt.contains("지은님"));
        assert!(!prompt.contains("게스트님"));
    }

    #[test]
    fn test_daily_prompt_spells_out_birth_data() {
        let request = FortuneRequest::Daily {
            user_name: None,
            profile: profile(Some("지은")),
        };

        let prompt = build(&request);
        assert!(prompt.contains("여성"));
        assert!(prompt.contains("1990-05-01 (양력)"));
        assert!(prompt.contains("묘시"));
    }

    #[test]
    fn test_compatibility_prompt_contains_both_profiles() {
        let request = FortuneRequest::Compatibility {
            first: profile(Some("지은")),
            second: UserProfile {
                name: Some("민준".to_string()),
                gender: Gender::Male,
                birth_date: "1988-02-14".to_string(),
                calendar_type: CalendarType::Lunar,
                birth_time: BirthTime::Unknown,
                profile_image_url: None,
            },
        };

        let prompt = build(&request);
        assert!(prompt.contains("지은"));
        assert!(prompt.contains("민준"));
        assert!(prompt.contains("음력"));
        assert!(prompt.contains("모름"));
    }
}
