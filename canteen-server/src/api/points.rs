//! Reward points lookup

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use shared::error::AppError;
use shared::models::PointsBalance;

use crate::db;
use crate::state::AppState;

use super::ApiResult;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsQuery {
    pub employee_id: Option<String>,
}

/// GET /api/points?employeeId=
///
/// Employees without a ledger row have zero points.
pub async fn balance(
    State(state): State<AppState>,
    Query(query): Query<PointsQuery>,
) -> ApiResult<PointsBalance> {
    let employee_id = query
        .employee_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::validation("Missing employeeId"))?;

    let points = db::user_points::balance(&state.pool, employee_id)
        .await
        .map_err(|e| {
            tracing::error!(employee_id = %employee_id, "Failed to read points: {e}");
            AppError::database("Failed to fetch points")
        })?;

    Ok(Json(PointsBalance { points }))
}
