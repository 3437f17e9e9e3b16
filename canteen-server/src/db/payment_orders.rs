//! payment_order and payment_order_entry repository

use shared::models::{PaymentOrder, PaymentOrderStatus, PricedEntry};
use sqlx::{Executor, QueryBuilder, Sqlite};

pub async fn insert(
    conn: impl Executor<'_, Database = Sqlite>,
    order: &PaymentOrder,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO payment_order
            (order_id, employee_id, amount, currency, receipt, points_redeemed, status, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&order.order_id)
    .bind(&order.employee_id)
    .bind(order.amount)
    .bind(&order.currency)
    .bind(&order.receipt)
    .bind(order.points_redeemed)
    .bind(order.status)
    .bind(order.created_at)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn find(
    conn: impl Executor<'_, Database = Sqlite>,
    order_id: &str,
) -> Result<Option<PaymentOrder>, sqlx::Error> {
    sqlx::query_as::<_, PaymentOrder>(
        "SELECT order_id, employee_id, amount, currency, receipt, points_redeemed, status, created_at
         FROM payment_order WHERE order_id = ?",
    )
    .bind(order_id)
    .fetch_optional(conn)
    .await
}

/// Store the priced dates an order pays for
pub async fn insert_entries(
    conn: impl Executor<'_, Database = Sqlite>,
    order_id: &str,
    entries: &[PricedEntry],
) -> Result<(), sqlx::Error> {
    if entries.is_empty() {
        return Ok(());
    }
    let mut qb = QueryBuilder::<Sqlite>::new(
        "INSERT INTO payment_order_entry (order_id, date, meal_type, price) ",
    );
    qb.push_values(entries, |mut row, e| {
        row.push_bind(order_id)
            .push_bind(&e.date)
            .push_bind(e.meal_type)
            .push_bind(e.price);
    });
    qb.build().execute(conn).await?;
    Ok(())
}

pub async fn list_entries(
    conn: impl Executor<'_, Database = Sqlite>,
    order_id: &str,
) -> Result<Vec<PricedEntry>, sqlx::Error> {
    sqlx::query_as::<_, PricedEntry>(
        "SELECT date, meal_type, price FROM payment_order_entry
         WHERE order_id = ? ORDER BY date",
    )
    .bind(order_id)
    .fetch_all(conn)
    .await
}

/// created -> paid. Returns false if the order is unknown or already paid.
pub async fn mark_paid(
    conn: impl Executor<'_, Database = Sqlite>,
    order_id: &str,
) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("UPDATE payment_order SET status = ? WHERE order_id = ? AND status = ?")
        .bind(PaymentOrderStatus::Paid)
        .bind(order_id)
        .bind(PaymentOrderStatus::Created)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() == 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    use shared::models::MealType;

    fn order() -> PaymentOrder {
        PaymentOrder {
            order_id: "order_1".to_string(),
            employee_id: "E1".to_string(),
            amount: 7000,
            currency: "INR".to_string(),
            receipt: "receipt_order_1".to_string(),
            points_redeemed: 0,
            status: PaymentOrderStatus::Created,
            created_at: 1,
        }
    }

    #[tokio::test]
    async fn test_mark_paid_once() {
        let pool = crate::db::memory_pool().await.unwrap();
        insert(&pool, &order()).await.unwrap();

        assert!(mark_paid(&pool, "order_1").await.unwrap());
        assert!(!mark_paid(&pool, "order_1").await.unwrap());
        assert!(!mark_paid(&pool, "order_2").await.unwrap());

        let stored = find(&pool, "order_1").await.unwrap().unwrap();
        assert_eq!(stored.status, PaymentOrderStatus::Paid);
        assert_eq!(stored.amount, 7000);
    }

    #[tokio::test]
    async fn test_order_entries_listed_by_date() {
        let pool = crate::db::memory_pool().await.unwrap();
        insert(&pool, &order()).await.unwrap();
        let entries = vec![
            PricedEntry {
                date: "2025-01-08".to_string(),
                meal_type: MealType::NonVeg,
                price: 70,
            },
            PricedEntry {
                date: "2025-01-06".to_string(),
                meal_type: MealType::Veg,
                price: 45,
            },
        ];
        insert_entries(&pool, "order_1", &entries).await.unwrap();
        insert_entries(&pool, "order_1", &[]).await.unwrap();

        let stored = list_entries(&pool, "order_1").await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].date, "2025-01-06");
        assert_eq!(stored[1].meal_type, MealType::NonVeg);
        assert!(list_entries(&pool, "order_2").await.unwrap().is_empty());
    }
}
