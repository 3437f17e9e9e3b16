//! payment repository (append-only)

use shared::models::Payment;
use sqlx::{Executor, Sqlite, SqlitePool};

pub struct NewPayment<'a> {
    pub date: &'a str,
    pub employee_id: &'a str,
    pub razorpay_order_id: &'a str,
    pub razorpay_payment_id: &'a str,
    pub razorpay_signature: &'a str,
    pub amount: i64,
    pub currency: &'a str,
    pub now: i64,
}

/// Record a payment. Returns false if the gateway payment id is already recorded.
pub async fn insert_if_absent(
    conn: impl Executor<'_, Database = Sqlite>,
    p: &NewPayment<'_>,
) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query(
        "INSERT INTO payment
            (date, employee_id, razorpay_order_id, razorpay_payment_id, razorpay_signature,
             amount, currency, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT (razorpay_payment_id) DO NOTHING",
    )
    .bind(p.date)
    .bind(p.employee_id)
    .bind(p.razorpay_order_id)
    .bind(p.razorpay_payment_id)
    .bind(p.razorpay_signature)
    .bind(p.amount)
    .bind(p.currency)
    .bind(p.now)
    .execute(conn)
    .await?;
    Ok(rows.rows_affected() == 1)
}

/// All payments, newest first
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Payment>, sqlx::Error> {
    sqlx::query_as::<_, Payment>(
        "SELECT id, date, employee_id, razorpay_order_id, razorpay_payment_id,
            razorpay_signature, amount, currency, created_at
         FROM payment ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM payment")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}
