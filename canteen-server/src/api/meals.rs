//! Meal booking endpoints: list, book, cancel

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::Deserialize;
use shared::error::AppError;
use shared::models::{BookingOutcome, BookingRequest, CancellationOutcome};

use crate::db;
use crate::services::{booking, cancellation};
use crate::state::AppState;

use super::ApiResult;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealsQuery {
    pub employee_id: Option<String>,
}

/// GET /api/meals?employeeId=
///
/// Entries change on every booking, so responses are never cached.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<MealsQuery>,
) -> Result<Response, AppError> {
    let employee_id = query
        .employee_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    let entries = match employee_id {
        Some(id) => db::meal_entries::list_by_employee(&state.pool, id).await,
        None => db::meal_entries::list_all(&state.pool).await,
    }
    .map_err(|e| {
        tracing::error!("Failed to list meal entries: {e}");
        AppError::database("Failed to fetch meal entries")
    })?;

    Ok((
        [(header::CACHE_CONTROL, "no-store, max-age=0")],
        Json(entries),
    )
        .into_response())
}

/// POST /api/meals
///
/// 201 with the created entries, or 200 with a quote when payment is due.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingOutcome>), AppError> {
    let outcome = booking::create_booking(&state, req, Utc::now()).await?;
    let status = match outcome {
        BookingOutcome::Booked { .. } => StatusCode::CREATED,
        BookingOutcome::PaymentRequired { .. } => StatusCode::OK,
    };
    Ok((status, Json(outcome)))
}

/// DELETE /api/meals/{id}
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CancellationOutcome> {
    let outcome = cancellation::cancel_entry(&state, &id, Utc::now()).await?;
    Ok(Json(outcome))
}
