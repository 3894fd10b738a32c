use sqlx::PgPool;
use tracing::info;

use crate::db::talisman_queries;
use crate::errors::AppError;
use crate::models::{CreateTalisman, Talisman};

/// List a user's stored talismans. A user with none gets an empty list,
/// not an error.
pub async fn list_for_user(pool: &PgPool, user_id: &str) -> Result<Vec<Talisman>, AppError> {
    let talismans = talisman_queries::fetch_by_user(pool, user_id).await?;
    info!("fetched {} talismans for user {}", talismans.len(), user_id);
    Ok(talismans)
}

/// Store a talisman record. The image itself was already produced by the
/// external image collaborator; only its URL and context land here.
pub async fn store(pool: &PgPool, input: CreateTalisman) -> Result<Talisman, AppError> {
    let user_id = input.user_id.ok_or(AppError::MissingField("userId"))?;
    let concern = input.concern.ok_or(AppError::MissingField("concern"))?;
    let image_url = input.image_url.ok_or(AppError::MissingField("imageUrl"))?;

    let talisman = talisman_queries::insert(pool, &user_id, &concern, &image_url).await?;
    Ok(talisman)
}
