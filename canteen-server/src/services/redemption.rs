//! QR / manual-code redemption

use shared::error::{AppError, ErrorCode};
use shared::models::MealEntry;
use sqlx::SqlitePool;

use crate::db::meal_entries;
use crate::error::{ServiceError, ServiceResult};

/// Mark an entry as consumed. Succeeds once per entry.
pub async fn redeem_entry(pool: &SqlitePool, id: &str, now_ms: i64) -> ServiceResult<MealEntry> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::validation("Missing or invalid Meal ID").into());
    }

    if meal_entries::mark_redeemed(pool, id, now_ms).await? {
        let entry = meal_entries::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Entry {id} vanished after redemption")))?;
        tracing::info!(
            entry_id = %id,
            employee_id = %entry.employee_id,
            date = %entry.date,
            "Meal redeemed"
        );
        return Ok(entry);
    }

    match meal_entries::find_by_id(pool, id).await? {
        None => {
            tracing::info!(entry_id = %id, "Redemption of unknown entry");
            Err(AppError::new(ErrorCode::MealEntryNotFound).into())
        }
        Some(entry) => {
            tracing::info!(entry_id = %id, "Entry already redeemed");
            let existing = serde_json::to_value(&entry).map_err(|e| ServiceError::Db(e.into()))?;
            Err(AppError::new(ErrorCode::MealAlreadyRedeemed)
                .with_detail("entry", existing)
                .into())
        }
    }
}
