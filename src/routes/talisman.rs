use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::{CreateTalisman, Talisman, TalismanList};
use crate::services::talisman_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_talisman))
        .route("/user", get(list_user_talismans))
}

#[derive(Debug, Deserialize)]
pub struct TalismanUserQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// GET /talisman/user?userId=
///
/// A user with no talismans gets an empty list, not an error.
#[axum::debug_handler]
pub async fn list_user_talismans(
    State(state): State<AppState>,
    Query(query): Query<TalismanUserQuery>,
) -> Result<Json<TalismanList>, AppError> {
    let user_id = query.user_id.ok_or(AppError::MissingField("userId"))?;
    info!("GET /talisman/user (user: {})", user_id);

    let talismans = talisman_service::list_for_user(&state.pool, &user_id).await?;
    Ok(Json(TalismanList { talismans }))
}

/// POST /talisman
///
/// Record a talisman image produced by the image collaborator.
#[axum::debug_handler]
pub async fn create_talisman(
    State(state): State<AppState>,
    Json(payload): Json<CreateTalisman>,
) -> Result<Json<Talisman>, AppError> {
    info!("POST /talisman");

    let talisman = talisman_service::store(&state.pool, payload).await?;
    Ok(Json(talisman))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_with_no_talismans_gets_empty_list_body() {
        // Zero rows is a success document, not an error envelope.
        let body = serde_json::to_value(TalismanList { talismans: vec![] }).unwrap();
        assert_eq!(body, json!({ "talismans": [] }));
        assert!(body.get("error").is_none());
    }

    #[test]
    fn test_user_query_accepts_missing_user_id() {
        // The extractor must succeed so the handler can answer 400 itself.
        let query: TalismanUserQuery = serde_json::from_value(json!({})).unwrap();
        assert!(query.user_id.is_none());
    }
}
