mod app;
mod db;
mod errors;
mod logging;
mod models;
mod routes;
mod services;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use crate::logging::LoggingConfig;
use crate::services::llm_service::{LlmConfig, LlmService};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    logging::init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let database_url = std::env::var("DATABASE_URL")?;
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let llm = Arc::new(LlmService::new(LlmConfig::from_env()));
    if !llm.is_enabled() {
        tracing::warn!("fortune generation is disabled; only lookup endpoints will succeed");
    }

    let state = AppState { pool, llm };
    let app = app::create_app(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("fortune backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
