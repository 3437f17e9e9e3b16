//! meal_entry repository

use shared::models::MealEntry;
use sqlx::{Executor, QueryBuilder, Sqlite, SqlitePool};

const COLUMNS: &str = "id, date, employee_id, employee_name, vertical, reporting_manager, \
     location, shift_timings, meal_type, payment_method, is_redeemed, redeemed_at, created_at";

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<MealEntry>, sqlx::Error> {
    sqlx::query_as::<_, MealEntry>(&format!(
        "SELECT {COLUMNS} FROM meal_entry ORDER BY date ASC, employee_name ASC"
    ))
    .fetch_all(pool)
    .await
}

pub async fn list_by_employee(
    pool: &SqlitePool,
    employee_id: &str,
) -> Result<Vec<MealEntry>, sqlx::Error> {
    sqlx::query_as::<_, MealEntry>(&format!(
        "SELECT {COLUMNS} FROM meal_entry WHERE employee_id = ? ORDER BY date ASC"
    ))
    .bind(employee_id)
    .fetch_all(pool)
    .await
}

pub async fn list_by_date(pool: &SqlitePool, date: &str) -> Result<Vec<MealEntry>, sqlx::Error> {
    sqlx::query_as::<_, MealEntry>(&format!(
        "SELECT {COLUMNS} FROM meal_entry WHERE date = ? ORDER BY employee_name ASC"
    ))
    .bind(date)
    .fetch_all(pool)
    .await
}

/// Redeemed entries, most recent redemption first
pub async fn list_redeemed(pool: &SqlitePool) -> Result<Vec<MealEntry>, sqlx::Error> {
    sqlx::query_as::<_, MealEntry>(&format!(
        "SELECT {COLUMNS} FROM meal_entry WHERE is_redeemed = 1 ORDER BY redeemed_at DESC"
    ))
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(
    conn: impl Executor<'_, Database = Sqlite>,
    id: &str,
) -> Result<Option<MealEntry>, sqlx::Error> {
    sqlx::query_as::<_, MealEntry>(&format!("SELECT {COLUMNS} FROM meal_entry WHERE id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Subset of `dates` already booked by the employee, ascending
pub async fn existing_dates(
    conn: impl Executor<'_, Database = Sqlite>,
    employee_id: &str,
    dates: &[String],
) -> Result<Vec<String>, sqlx::Error> {
    if dates.is_empty() {
        return Ok(Vec::new());
    }
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT date FROM meal_entry WHERE employee_id = ");
    qb.push_bind(employee_id);
    qb.push(" AND date IN (");
    let mut sep = qb.separated(", ");
    for date in dates {
        sep.push_bind(date);
    }
    sep.push_unseparated(") ORDER BY date ASC");

    let rows: Vec<(String,)> = qb.build_query_as().fetch_all(conn).await?;
    Ok(rows.into_iter().map(|r| r.0).collect())
}

pub async fn insert(
    conn: impl Executor<'_, Database = Sqlite>,
    entry: &MealEntry,
) -> Result<(), sqlx::Error> {
    sqlx::query(&format!(
        "INSERT INTO meal_entry ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    ))
    .bind(&entry.id)
    .bind(&entry.date)
    .bind(&entry.employee_id)
    .bind(&entry.employee_name)
    .bind(&entry.vertical)
    .bind(&entry.reporting_manager)
    .bind(&entry.location)
    .bind(&entry.shift_timings)
    .bind(entry.meal_type)
    .bind(entry.payment_method)
    .bind(entry.is_redeemed)
    .bind(entry.redeemed_at)
    .bind(entry.created_at)
    .execute(conn)
    .await?;
    Ok(())
}

/// PENDING -> REDEEMED. Returns false if the entry is missing or already redeemed.
pub async fn mark_redeemed(
    conn: impl Executor<'_, Database = Sqlite>,
    id: &str,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query(
        "UPDATE meal_entry SET is_redeemed = 1, redeemed_at = ? WHERE id = ? AND is_redeemed = 0",
    )
    .bind(now)
    .bind(id)
    .execute(conn)
    .await?;
    Ok(rows.rows_affected() == 1)
}

/// Delete an entry that has not been redeemed yet
pub async fn delete_unredeemed(
    conn: impl Executor<'_, Database = Sqlite>,
    id: &str,
) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM meal_entry WHERE id = ? AND is_redeemed = 0")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{MealType, PaymentMethod};

    fn entry(id: &str, date: &str, employee_id: &str) -> MealEntry {
        MealEntry {
            id: id.to_string(),
            date: date.to_string(),
            employee_id: employee_id.to_string(),
            employee_name: format!("Name {employee_id}"),
            vertical: "Ops".to_string(),
            reporting_manager: "Ravi".to_string(),
            location: "Pune".to_string(),
            shift_timings: "9-6".to_string(),
            meal_type: MealType::NonVeg,
            payment_method: PaymentMethod::Standard,
            is_redeemed: false,
            redeemed_at: None,
            created_at: 1,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let pool = crate::db::memory_pool().await.unwrap();
        insert(&pool, &entry("a", "2025-01-08", "E1")).await.unwrap();

        let found = find_by_id(&pool, "a").await.unwrap().unwrap();
        assert_eq!(found.meal_type, MealType::NonVeg);
        assert_eq!(found.payment_method, PaymentMethod::Standard);
        assert!(!found.is_redeemed);
        assert!(find_by_id(&pool, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_date_per_employee() {
        let pool = crate::db::memory_pool().await.unwrap();
        insert(&pool, &entry("a", "2025-01-08", "E1")).await.unwrap();
        assert!(insert(&pool, &entry("b", "2025-01-08", "E1")).await.is_err());
        // Another employee may book the same date
        insert(&pool, &entry("c", "2025-01-08", "E2")).await.unwrap();
    }

    #[tokio::test]
    async fn test_existing_dates() {
        let pool = crate::db::memory_pool().await.unwrap();
        insert(&pool, &entry("a", "2025-01-08", "E1")).await.unwrap();
        insert(&pool, &entry("b", "2025-01-10", "E1")).await.unwrap();
        insert(&pool, &entry("c", "2025-01-09", "E2")).await.unwrap();

        let dates = vec![
            "2025-01-10".to_string(),
            "2025-01-09".to_string(),
            "2025-01-08".to_string(),
        ];
        let found = existing_dates(&pool, "E1", &dates).await.unwrap();
        assert_eq!(found, vec!["2025-01-08", "2025-01-10"]);
        assert!(existing_dates(&pool, "E1", &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mark_redeemed_once() {
        let pool = crate::db::memory_pool().await.unwrap();
        insert(&pool, &entry("a", "2025-01-08", "E1")).await.unwrap();

        assert!(mark_redeemed(&pool, "a", 100).await.unwrap());
        assert!(!mark_redeemed(&pool, "a", 200).await.unwrap());
        assert!(!mark_redeemed(&pool, "missing", 200).await.unwrap());

        let found = find_by_id(&pool, "a").await.unwrap().unwrap();
        assert!(found.is_redeemed);
        assert_eq!(found.redeemed_at, Some(100));
    }

    #[tokio::test]
    async fn test_delete_skips_redeemed() {
        let pool = crate::db::memory_pool().await.unwrap();
        insert(&pool, &entry("a", "2025-01-08", "E1")).await.unwrap();
        insert(&pool, &entry("b", "2025-01-09", "E1")).await.unwrap();
        mark_redeemed(&pool, "b", 100).await.unwrap();

        assert!(delete_unredeemed(&pool, "a").await.unwrap());
        assert!(!delete_unredeemed(&pool, "a").await.unwrap());
        assert!(!delete_unredeemed(&pool, "b").await.unwrap());
        assert_eq!(list_all(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_listing_order() {
        let pool = crate::db::memory_pool().await.unwrap();
        insert(&pool, &entry("a", "2025-01-09", "E2")).await.unwrap();
        insert(&pool, &entry("b", "2025-01-08", "E1")).await.unwrap();
        insert(&pool, &entry("c", "2025-01-09", "E1")).await.unwrap();
        mark_redeemed(&pool, "b", 100).await.unwrap();
        mark_redeemed(&pool, "c", 300).await.unwrap();

        let all: Vec<String> = list_all(&pool).await.unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(all, vec!["b", "c", "a"]);

        let by_date = list_by_date(&pool, "2025-01-09").await.unwrap();
        assert_eq!(by_date.len(), 2);

        let mine = list_by_employee(&pool, "E1").await.unwrap();
        assert_eq!(mine.len(), 2);

        let redeemed: Vec<String> = list_redeemed(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(redeemed, vec!["c", "b"]);
    }
}
