use tracing::{info, warn};

use crate::errors::{AppError, LlmError};
use crate::models::{DailyFortune, FortuneRequest};
use crate::services::llm_service::LlmService;
use crate::services::prompt_builder;

/// Topic-concern and direct-question fortunes: the provider text IS the
/// fortune, returned verbatim.
pub async fn generate_text(
    llm: &LlmService,
    session_key: &str,
    request: &FortuneRequest,
) -> Result<String, AppError> {
    info!("generating {} fortune (session: {})", request.kind(), session_key);

    let prompt = prompt_builder::build(request);
    let text = llm.generate_for_session(session_key, prompt).await?;

    Ok(text)
}

/// Daily fortune: the provider is asked for a fixed JSON shape and the raw
/// output is reshaped into `DailyFortune`. Output that cannot be reshaped is
/// a provider error; a half-filled daily fortune is never surfaced.
pub async fn generate_daily(
    llm: &LlmService,
    session_key: &str,
    request: &FortuneRequest,
) -> Result<DailyFortune, AppError> {
    info!("generating daily fortune (session: {})", session_key);

    let prompt = prompt_builder::build(request);
    let raw = llm.generate_for_session(session_key, prompt).await?;

    let fortune = parse_daily(&raw).map_err(|e| {
        warn!("daily fortune reshape failed: {}", e);
        AppError::Provider(e)
    })?;

    Ok(fortune)
}

/// Providers wrap JSON in markdown fences often enough that one lenient
/// unwrapping pass is warranted; after that the parse is strict, all fields
/// required.
fn parse_daily(raw: &str) -> Result<DailyFortune, LlmError> {
    let stripped = strip_code_fences(raw);

    serde_json::from_str::<DailyFortune>(stripped)
        .map_err(|e| LlmError::InvalidResponse(format!("daily fortune: {}", e)))
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("json") after the opening fence.
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };

    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = r#"{
        "overview": "전반적으로 순조로운 하루입니다.",
        "wealth": "뜻밖의 지출을 조심하세요.",
        "love": "솔직한 대화가 관계를 깊게 합니다.",
        "health": "가벼운 산책이 도움이 됩니다.",
        "luckyItem": "파란 펜",
        "luckyColor": "남색",
        "advice": "서두르지 말고 한 걸음씩."
    }"#;

    #[test]
    fn test_parse_well_formed_daily() {
        let fortune = parse_daily(WELL_FORMED).unwrap();
        assert_eq!(fortune.lucky_item, "파란 펜");
        assert_eq!(fortune.advice, "서두르지 말고 한 걸음씩.");
    }

    #[test]
    fn test_parse_daily_with_code_fences() {
        let fenced = format!("```json\n{}\n```", WELL_FORMED);
        let fortune = parse_daily(&fenced).unwrap();
        assert_eq!(fortune.lucky_color, "남색");
    }

    #[test]
    fn test_missing_field_is_provider_error() {
        let partial = r#"{"overview": "좋은 하루", "advice": "웃으세요"}"#;
        assert!(matches!(
            parse_daily(partial),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_free_text_is_provider_error() {
        let prose = "오늘은 전반적으로 좋은 하루입니다. 행운의 색은 남색입니다.";
        assert!(matches!(
            parse_daily(prose),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_strip_code_fences_passthrough() {
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
    }
}
