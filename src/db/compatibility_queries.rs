use sqlx::PgPool;

use crate::models::{CompatibilityRecord, CreateCompatibilityRecord};

pub async fn insert(
    pool: &PgPool,
    record: CreateCompatibilityRecord,
) -> Result<CompatibilityRecord, sqlx::Error> {
    sqlx::query_as::<_, CompatibilityRecord>(
        r#"
        INSERT INTO compatibility_results (share_token, first_name, second_name, result_text)
        VALUES ($1, $2, $3, $4)
        RETURNING id, share_token, first_name, second_name, result_text, created_at
        "#,
    )
    .bind(record.share_token)
    .bind(record.first_name)
    .bind(record.second_name)
    .bind(record.result_text)
    .fetch_one(pool)
    .await
}

pub async fn fetch_by_token(
    pool: &PgPool,
    share_token: &str,
) -> Result<Option<CompatibilityRecord>, sqlx::Error> {
    sqlx::query_as::<_, CompatibilityRecord>(
        r#"
        SELECT id, share_token, first_name, second_name, result_text, created_at
        FROM compatibility_results
        WHERE share_token = $1
        "#,
    )
    .bind(share_token)
    .fetch_optional(pool)
    .await
}
