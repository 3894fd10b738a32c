use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::info;

use crate::errors::AppError;
use crate::models::{
    DailyFortune, DailyFortunePayload, DataEnvelope, DirectFortunePayload, FortuneText,
    TopicFortunePayload,
};
use crate::services::{fortune_service, validation};
use crate::session::Session;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(topic_fortune))
        .route("/direct", post(direct_fortune))
        .route("/daily", post(daily_fortune))
}

/// POST /fortune
///
/// Topic-concern fortune: a concern plus three escalating detail levels.
#[axum::debug_handler]
pub async fn topic_fortune(
    session: Session,
    State(state): State<AppState>,
    Json(payload): Json<TopicFortunePayload>,
) -> Result<Json<FortuneText>, AppError> {
    info!("POST /fortune (session: {})", session.key());

    let request = validation::validate_topic(payload)?;
    let fortune = fortune_service::generate_text(&state.llm, session.key(), &request).await?;

    Ok(Json(FortuneText { fortune }))
}

/// POST /fortune/direct
///
/// Free-form question, answered verbatim from the provider.
#[axum::debug_handler]
pub async fn direct_fortune(
    session: Session,
    State(state): State<AppState>,
    Json(payload): Json<DirectFortunePayload>,
) -> Result<Json<FortuneText>, AppError> {
    info!("POST /fortune/direct (session: {})", session.key());

    let request = validation::validate_direct(payload)?;
    let fortune = fortune_service::generate_text(&state.llm, session.key(), &request).await?;

    Ok(Json(FortuneText { fortune }))
}

/// POST /fortune/daily
///
/// Daily fortune reshaped into the fixed multi-field structure.
#[axum::debug_handler]
pub async fn daily_fortune(
    session: Session,
    State(state): State<AppState>,
    Json(payload): Json<DailyFortunePayload>,
) -> Result<Json<DataEnvelope<DailyFortune>>, AppError> {
    info!("POST /fortune/daily (session: {})", session.key());

    let request = validation::validate_daily(payload)?;
    let data = fortune_service::generate_daily(&state.llm, session.key(), &request).await?;

    Ok(Json(DataEnvelope::ok(data)))
}
