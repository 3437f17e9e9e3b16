//! Meal cancellation with point refund

use chrono::{DateTime, Utc};
use shared::error::{AppError, ErrorCode};
use shared::models::{CancellationOutcome, MealEntry};
use shared::util::parse_date;

use crate::db::{meal_entries, point_history, user_points};
use crate::error::ServiceResult;
use crate::state::AppState;

fn not_found_outcome(id: &str, message: &str) -> CancellationOutcome {
    CancellationOutcome {
        id: id.to_string(),
        cancelled: false,
        points_credited: 0,
        message: message.to_string(),
    }
}

fn redeemed_error(entry: &MealEntry) -> AppError {
    AppError::with_message(
        ErrorCode::MealAlreadyRedeemed,
        "Redeemed meals cannot be cancelled.",
    )
    .with_detail("id", entry.id.clone())
}

/// Cancel an entry and refund its price as points
///
/// A missing entry is a success (the client just drops it). Redeemed and
/// past entries are rejected without any change.
pub async fn cancel_entry(
    state: &AppState,
    id: &str,
    now: DateTime<Utc>,
) -> ServiceResult<CancellationOutcome> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::validation("Invalid ID").into());
    }

    let Some(entry) = meal_entries::find_by_id(&state.pool, id).await? else {
        tracing::info!(entry_id = %id, "Entry not found, assuming already cancelled");
        return Ok(not_found_outcome(id, "Entry already cancelled or not found."));
    };
    if entry.is_redeemed {
        return Err(redeemed_error(&entry).into());
    }

    let date = parse_date(&entry.date)
        .ok_or_else(|| AppError::internal(format!("Stored entry {id} has invalid date")))?;
    state.window.check_cancellable(date, now)?;

    let refund = state.prices.price(entry.meal_type);
    let now_ms = now.timestamp_millis();

    let mut tx = state.pool.begin().await?;

    if !meal_entries::delete_unredeemed(&mut *tx, id).await? {
        tx.rollback().await?;
        // Lost a race with another cancel or a redemption
        return match meal_entries::find_by_id(&state.pool, id).await? {
            Some(current) if current.is_redeemed => Err(redeemed_error(&current).into()),
            _ => Ok(not_found_outcome(id, "Entry already processed.")),
        };
    }
    user_points::credit(&mut *tx, &entry.employee_id, refund, now_ms).await?;
    point_history::append(
        &mut *tx,
        &entry.employee_id,
        refund,
        &format!("Cancellation of meal entry {id} for date {}", entry.date),
        now_ms,
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        entry_id = %id,
        employee_id = %entry.employee_id,
        date = %entry.date,
        points = refund,
        "Meal cancelled, points credited"
    );
    Ok(CancellationOutcome {
        id: id.to_string(),
        cancelled: true,
        points_credited: refund,
        message: "Meal cancelled successfully. Reward Points added.".to_string(),
    })
}
