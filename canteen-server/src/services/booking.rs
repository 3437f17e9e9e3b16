//! Booking creation

use chrono::{DateTime, Utc};
use shared::error::AppError;
use shared::models::{BookingOutcome, BookingRequest, MealEntry, PaymentMethod};
use sqlx::SqliteConnection;

use crate::booking::{BatchPlan, plan_batch, validate_drafts};
use crate::db::{meal_entries, point_history, user_points};
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;

/// Validate a booking request against the rules and stored state, then price it
///
/// Rejects duplicate dates (listing them), closed booking windows and point
/// requests above the current balance. Nothing is written.
pub async fn plan_booking(
    state: &AppState,
    request: &BookingRequest,
    now: DateTime<Utc>,
) -> ServiceResult<BatchPlan> {
    let (employee_id, dates) = validate_drafts(&request.entries)?;
    if request.redeem_points < 0 {
        return Err(AppError::validation("redeemPoints must not be negative").into());
    }
    for date in &dates {
        state.window.check_bookable(*date, now)?;
    }

    let date_keys: Vec<String> = dates.iter().map(|d| d.to_string()).collect();
    let existing = meal_entries::existing_dates(&state.pool, &employee_id, &date_keys).await?;
    if !existing.is_empty() {
        return Err(AppError::duplicate_booking(&existing).into());
    }

    let balance = user_points::balance(&state.pool, &employee_id).await?;
    if request.redeem_points > balance {
        return Err(AppError::insufficient_points(balance, request.redeem_points).into());
    }

    let drafts = request.entries.iter().cloned().zip(dates).collect();
    Ok(plan_batch(
        &state.prices,
        &employee_id,
        drafts,
        request.redeem_points,
        balance,
    ))
}

/// Create a booking
///
/// Fully covered bookings (points or zero cost) are persisted at once.
/// Anything with a remainder comes back as a quote to pay through the gateway.
pub async fn create_booking(
    state: &AppState,
    request: BookingRequest,
    now: DateTime<Utc>,
) -> ServiceResult<BookingOutcome> {
    let plan = plan_booking(state, &request, now).await?;

    if plan.payable() > 0 {
        tracing::info!(
            employee_id = %plan.employee_id,
            total_cost = plan.total_cost,
            points = plan.points_redeemed,
            payable = plan.payable(),
            "Booking requires gateway payment"
        );
        return Ok(BookingOutcome::PaymentRequired { quote: plan.quote() });
    }

    let employee_id = plan.employee_id.clone();
    let points = plan.points_redeemed;
    let now_ms = now.timestamp_millis();
    let batch_key = uuid::Uuid::new_v4().to_string();
    let entries = plan.into_entries(&batch_key, PaymentMethod::Standard, now_ms);

    let mut tx = state.pool.begin().await?;

    if points > 0 {
        spend_points(
            &mut tx,
            &employee_id,
            points,
            &format!("Redemption for booking {} meal(s)", entries.len()),
            now_ms,
        )
        .await?;
    }
    insert_entries(&mut tx, &entries).await?;

    tx.commit().await?;

    tracing::info!(
        employee_id = %employee_id,
        count = entries.len(),
        points,
        "Meals booked"
    );
    Ok(BookingOutcome::Booked {
        count: entries.len(),
        entries,
    })
}

/// Debit points and append the ledger row. Fails if the balance moved below `points`.
pub(crate) async fn spend_points(
    conn: &mut SqliteConnection,
    employee_id: &str,
    points: i64,
    reason: &str,
    now_ms: i64,
) -> ServiceResult<()> {
    if !user_points::debit(&mut *conn, employee_id, points, now_ms).await? {
        let balance = user_points::balance(&mut *conn, employee_id).await?;
        return Err(AppError::insufficient_points(balance, points).into());
    }
    point_history::append(&mut *conn, employee_id, -points, reason, now_ms).await?;
    Ok(())
}

/// Insert entries, reporting a unique violation as a duplicate booking
pub(crate) async fn insert_entries(
    conn: &mut SqliteConnection,
    entries: &[MealEntry],
) -> ServiceResult<()> {
    for entry in entries {
        meal_entries::insert(&mut *conn, entry)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => ServiceError::App(
                    AppError::duplicate_booking(std::slice::from_ref(&entry.date)),
                ),
                other => other.into(),
            })?;
    }
    Ok(())
}
