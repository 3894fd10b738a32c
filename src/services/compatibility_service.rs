use rand::distr::Alphanumeric;
use rand::Rng;
use sqlx::PgPool;
use tracing::{error, info};

use crate::db::compatibility_queries;
use crate::errors::AppError;
use crate::models::{
    CompatibilityRecord, CompatibilityResult, CreateCompatibilityRecord, FortuneRequest,
    UserProfile,
};
use crate::services::llm_service::LlmService;
use crate::services::prompt_builder;

const SHARE_TOKEN_LEN: usize = 22;

/// Generate a compatibility reading for two profiles and persist it under a
/// fresh share token. Generation and persistence fail distinguishably: a
/// storage failure after successful generation is `Persistence`, so the
/// caller can still decide to show the text without a share link.
pub async fn generate_and_store(
    llm: &LlmService,
    pool: &PgPool,
    session_key: &str,
    first: UserProfile,
    second: UserProfile,
) -> Result<CompatibilityResult, AppError> {
    info!("generating compatibility reading (session: {})", session_key);

    let first_name = profile_name(&first);
    let second_name = profile_name(&second);

    let request = FortuneRequest::Compatibility { first, second };
    let prompt = prompt_builder::build(&request);
    let result_text = llm.generate_for_session(session_key, prompt).await?;

    let record = CreateCompatibilityRecord {
        share_token: mint_share_token(),
        first_name,
        second_name,
        result_text,
    };

    let stored = compatibility_queries::insert(pool, record)
        .await
        .map_err(|e| {
            error!("failed to persist compatibility result: {}", e);
            AppError::Persistence(e)
        })?;

    Ok(CompatibilityResult {
        compatibility: stored.result_text,
        share_token: stored.share_token,
    })
}

/// Anonymous lookup of a persisted reading by its share token.
pub async fn fetch_shared(pool: &PgPool, token: &str) -> Result<CompatibilityRecord, AppError> {
    let record = compatibility_queries::fetch_by_token(pool, token).await?;
    resolve_shared(record)
}

/// Zero matching rows is a NotFound for the client, never a silent empty
/// record; exactly one row is returned untouched.
fn resolve_shared(record: Option<CompatibilityRecord>) -> Result<CompatibilityRecord, AppError> {
    record.ok_or(AppError::NotFound)
}

fn profile_name(profile: &UserProfile) -> String {
    profile
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("게스트")
        .to_string()
}

fn mint_share_token() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(SHARE_TOKEN_LEN)
        .map(char::from)
        .collect()
}
