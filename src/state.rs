use std::sync::Arc;

use sqlx::PgPool;

use crate::services::llm_service::LlmService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub llm: Arc<LlmService>,
}
