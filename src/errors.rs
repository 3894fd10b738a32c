use axum::response::IntoResponse;
use axum::Json;
use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Failures of the outbound generation-provider call.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider request timed out")]
    Timeout,
    #[error("rate limited by provider")]
    RateLimited,
    #[error("network error: {0}")]
    NetworkError(String),
    #[error("provider API error: {0}")]
    ApiError(String),
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
    #[error("LLM features are disabled")]
    Disabled,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("provider error: {0}")]
    Provider(#[from] LlmError),
    #[error("persistence error after generation: {0}")]
    Persistence(sqlx::Error),
    #[error("not found")]
    NotFound,
    #[error("database error: {0}")]
    Db(sqlx::Error),
    #[error("unknown error: {0}")]
    Unknown(String),
}

impl From<sqlx::Error> for AppError {
    fn from(value: sqlx::Error) -> Self {
        AppError::Db(value)
    }
}

/// Error envelope shared by every endpoint. The client sees a localized
/// message and a machine-checkable flag, never provider or sqlx detail.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: bool,
    pub message: String,
}

impl AppError {
    fn client_message(&self) -> String {
        match self {
            AppError::MissingField(field) => format!("필수 입력값이 없습니다: {}", field),
            AppError::NotFound => "요청하신 결과를 찾을 수 없어요.".to_string(),
            AppError::Provider(_)
            | AppError::Persistence(_)
            | AppError::Db(_)
            | AppError::Unknown(_) => {
                "운세를 불러오는 중 문제가 발생했어요. 잠시 후 다시 시도해 주세요.".to_string()
            }
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::MissingField(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Full detail stays server-side.
            error!("request failed: {}", self);
        }
        let body = ErrorBody {
            error: true,
            message: self.client_message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_maps_to_400() {
        let err = AppError::MissingField("concern");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.client_message().contains("concern"));
    }

    #[test]
    fn test_provider_errors_are_generic_500() {
        let err = AppError::Provider(LlmError::ApiError("HTTP 503: upstream detail".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.client_message().contains("upstream"));
        assert!(!err.client_message().is_empty());
    }

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
    }
}
