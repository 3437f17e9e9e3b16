//! user_point repository

use sqlx::{Executor, Sqlite};

/// Current balance (0 for employees without a row)
pub async fn balance(
    conn: impl Executor<'_, Database = Sqlite>,
    employee_id: &str,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) =
        sqlx::query_as("SELECT COALESCE(SUM(points), 0) FROM user_point WHERE employee_id = ?")
            .bind(employee_id)
            .fetch_one(conn)
            .await?;
    Ok(row.0)
}

/// Add points, creating the balance row on first credit
pub async fn credit(
    conn: impl Executor<'_, Database = Sqlite>,
    employee_id: &str,
    amount: i64,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO user_point (employee_id, points, updated_at) VALUES (?, ?, ?)
         ON CONFLICT (employee_id) DO UPDATE SET
            points = user_point.points + excluded.points,
            updated_at = excluded.updated_at",
    )
    .bind(employee_id)
    .bind(amount)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(())
}

/// Spend points. Returns false (and changes nothing) if the balance is too low.
pub async fn debit(
    conn: impl Executor<'_, Database = Sqlite>,
    employee_id: &str,
    amount: i64,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query(
        "UPDATE user_point SET points = points - ?, updated_at = ?
         WHERE employee_id = ? AND points >= ?",
    )
    .bind(amount)
    .bind(now)
    .bind(employee_id)
    .bind(amount)
    .execute(conn)
    .await?;
    Ok(rows.rows_affected() == 1)
}
