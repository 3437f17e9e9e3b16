//! point_history repository (append-only ledger)

use shared::models::PointHistory;
use sqlx::{Executor, Sqlite, SqlitePool};

pub async fn append(
    conn: impl Executor<'_, Database = Sqlite>,
    employee_id: &str,
    change: i64,
    reason: &str,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO point_history (employee_id, change, reason, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(employee_id)
    .bind(change)
    .bind(reason)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(())
}

/// Ledger rows for one employee, oldest first
pub async fn list_by_employee(
    pool: &SqlitePool,
    employee_id: &str,
) -> Result<Vec<PointHistory>, sqlx::Error> {
    sqlx::query_as::<_, PointHistory>(
        "SELECT id, employee_id, change, reason, created_at FROM point_history
         WHERE employee_id = ? ORDER BY id ASC",
    )
    .bind(employee_id)
    .fetch_all(pool)
    .await
}
