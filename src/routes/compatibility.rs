use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;

use crate::errors::AppError;
use crate::models::{
    CompatibilityPayload, CompatibilityRecord, CompatibilityResult, DataEnvelope, FortuneRequest,
};
use crate::services::{compatibility_service, validation};
use crate::session::Session;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_compatibility))
}

/// Anonymous share lookups live under their own prefix so a shared link
/// works without any session.
pub fn share_router() -> Router<AppState> {
    Router::new()
        .route("/", get(share_without_token))
        .route("/:token", get(get_shared))
}

/// POST /compatibility
///
/// Generate a compatibility reading for two profiles, persist it, and hand
/// back the text with its share token.
#[axum::debug_handler]
pub async fn create_compatibility(
    session: Session,
    State(state): State<AppState>,
    Json(payload): Json<CompatibilityPayload>,
) -> Result<Json<DataEnvelope<CompatibilityResult>>, AppError> {
    info!("POST /compatibility (session: {})", session.key());

    let FortuneRequest::Compatibility { first, second } =
        validation::validate_compatibility(payload)?
    else {
        return Err(AppError::Unknown("unexpected request variant".to_string()));
    };

    let result =
        compatibility_service::generate_and_store(&state.llm, &state.pool, session.key(), first, second)
            .await?;

    Ok(Json(DataEnvelope::ok(result)))
}

/// GET /share/:token
#[axum::debug_handler]
pub async fn get_shared(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<CompatibilityRecord>, AppError> {
    info!("GET /share/{}", token);

    let record = compatibility_service::fetch_shared(&state.pool, &token).await?;
    Ok(Json(record))
}

/// GET /share — a share link with no token is a client error, not a 404.
pub async fn share_without_token() -> AppError {
    AppError::MissingField("token")
}
