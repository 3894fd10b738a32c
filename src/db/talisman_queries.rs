use sqlx::PgPool;

use crate::models::Talisman;

pub async fn insert(
    pool: &PgPool,
    user_id: &str,
    concern: &str,
    image_url: &str,
) -> Result<Talisman, sqlx::Error> {
    sqlx::query_as::<_, Talisman>(
        r#"
        INSERT INTO talismans (user_id, concern, image_url)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, concern, image_url, created_at
        "#,
    )
    .bind(user_id)
    .bind(concern)
    .bind(image_url)
    .fetch_one(pool)
    .await
}

pub async fn fetch_by_user(pool: &PgPool, user_id: &str) -> Result<Vec<Talisman>, sqlx::Error> {
    sqlx::query_as::<_, Talisman>(
        r#"
        SELECT id, user_id, concern, image_url, created_at
        FROM talismans
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
