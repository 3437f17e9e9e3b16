//! feedback repository

use shared::models::Feedback;
use sqlx::SqlitePool;

pub async fn create(
    pool: &SqlitePool,
    category: Option<&str>,
    rating: Option<i64>,
    message: &str,
    now: i64,
) -> Result<Feedback, sqlx::Error> {
    sqlx::query_as::<_, Feedback>(
        "INSERT INTO feedback (category, rating, message, created_at) VALUES (?, ?, ?, ?)
         RETURNING id, category, rating, message, created_at",
    )
    .bind(category)
    .bind(rating)
    .bind(message)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// All feedback, newest first
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Feedback>, sqlx::Error> {
    sqlx::query_as::<_, Feedback>(
        "SELECT id, category, rating, message, created_at FROM feedback
         ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await
}
