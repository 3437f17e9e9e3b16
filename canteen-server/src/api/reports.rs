//! Admin reports: daily kitchen headcount, redemption log and CSV exports

use axum::Json;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use chrono::Utc;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{DailyMealReport, MealEntry, MealType, RedemptionReport};
use shared::util::parse_date;

use crate::db;
use crate::export;
use crate::state::AppState;

use super::ApiResult;

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    /// YYYY-MM-DD, defaults to today in the business timezone
    pub date: Option<String>,
}

impl DailyQuery {
    fn resolve(&self, state: &AppState) -> Result<String, AppError> {
        let date = match self.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => parse_date(raw).ok_or_else(|| {
                AppError::with_message(ErrorCode::InvalidFormat, "date must be YYYY-MM-DD")
                    .with_detail("date", raw)
            })?,
            None => state.window.today(Utc::now()),
        };
        Ok(date.format("%Y-%m-%d").to_string())
    }
}

fn summarize(date: String, entries: Vec<MealEntry>) -> DailyMealReport {
    let veg = entries
        .iter()
        .filter(|e| e.meal_type == MealType::Veg)
        .count();
    let redeemed = entries.iter().filter(|e| e.is_redeemed).count();
    DailyMealReport {
        date,
        total: entries.len(),
        veg,
        non_veg: entries.len() - veg,
        redeemed,
        pending: entries.len() - redeemed,
        entries,
    }
}

async fn entries_for(state: &AppState, date: &str) -> Result<Vec<MealEntry>, AppError> {
    db::meal_entries::list_by_date(&state.pool, date)
        .await
        .map_err(|e| {
            tracing::error!(date = %date, "Failed to build daily report: {e}");
            AppError::database("Failed to build report")
        })
}

async fn redeemed_entries(state: &AppState) -> Result<Vec<MealEntry>, AppError> {
    db::meal_entries::list_redeemed(&state.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to build redemption report: {e}");
            AppError::database("Failed to build report")
        })
}

/// GET /api/admin/reports/daily?date=
pub async fn daily(
    State(state): State<AppState>,
    Query(query): Query<DailyQuery>,
) -> ApiResult<DailyMealReport> {
    let date = query.resolve(&state)?;
    let entries = entries_for(&state, &date).await?;
    Ok(Json(summarize(date, entries)))
}

/// GET /api/admin/reports/redemptions
pub async fn redemptions(State(state): State<AppState>) -> ApiResult<RedemptionReport> {
    let entries = redeemed_entries(&state).await?;
    Ok(Json(RedemptionReport {
        total: entries.len(),
        entries,
    }))
}

// ── CSV exports ──

fn csv_attachment(
    filename: &str,
    rendered: Result<Vec<u8>, csv::Error>,
) -> Result<impl IntoResponse + use<>, AppError> {
    let body = rendered.map_err(|e| {
        tracing::error!(filename = %filename, "Failed to render CSV export: {e}");
        AppError::internal("Failed to render export")
    })?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    ))
}

/// GET /api/admin/reports/daily.csv?date=
pub async fn daily_csv(
    State(state): State<AppState>,
    Query(query): Query<DailyQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = query.resolve(&state)?;
    let entries = entries_for(&state, &date).await?;
    csv_attachment(
        &format!("meal_entries_{date}.csv"),
        export::daily_entries(&entries),
    )
}

/// GET /api/admin/reports/payments.csv
pub async fn payments_csv(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let payments = db::payments::list_all(&state.pool).await.map_err(|e| {
        tracing::error!("Failed to export payments: {e}");
        AppError::database("Failed to fetch payments")
    })?;
    csv_attachment(
        "transactions.csv",
        export::payments(&payments, state.window.tz),
    )
}

/// GET /api/admin/reports/feedback.csv
pub async fn feedback_csv(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let feedback = db::feedback::list_all(&state.pool).await.map_err(|e| {
        tracing::error!("Failed to export feedback: {e}");
        AppError::database("Failed to fetch feedback")
    })?;
    csv_attachment("feedback.csv", export::feedback(&feedback, state.window.tz))
}

/// GET /api/admin/reports/redemptions.csv
pub async fn redemptions_csv(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let entries = redeemed_entries(&state).await?;
    csv_attachment(
        "redemptions.csv",
        export::redemptions(&entries, state.window.tz),
    )
}
