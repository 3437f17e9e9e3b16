//! Admin console endpoints: login, redemption, listings

use axum::extract::State;
use axum::{Extension, Json};
use shared::error::AppError;
use shared::models::{
    Feedback, LoginRequest, LoginResponse, MealEntry, Payment, RedeemRequest, RedeemResponse,
};

use crate::auth::{AdminIdentity, Credentials};
use crate::db;
use crate::services::redemption;
use crate::state::AppState;

use super::ApiResult;

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let credentials = Credentials {
        username: req.username.trim().to_string(),
        password: req.password,
    };
    let session = state.admin_auth.authenticate(&credentials).inspect_err(|_| {
        tracing::warn!(username = %credentials.username, "Admin login failed");
    })?;

    tracing::info!(username = %session.username, "Admin logged in");
    Ok(Json(LoginResponse {
        token: session.token,
        username: session.username,
        expires_at: session.expires_at,
    }))
}

/// POST /api/admin/redeem
pub async fn redeem(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Json(req): Json<RedeemRequest>,
) -> ApiResult<RedeemResponse> {
    let now = shared::util::now_millis();
    let entry = redemption::redeem_entry(&state.pool, &req.id, now).await?;
    tracing::info!(entry_id = %entry.id, admin = %identity.username, "Redemption recorded");

    Ok(Json(RedeemResponse {
        message: "Meal redeemed successfully!".to_string(),
        entry,
    }))
}

/// GET /api/admin/meals
pub async fn list_meals(State(state): State<AppState>) -> ApiResult<Vec<MealEntry>> {
    let entries = db::meal_entries::list_all(&state.pool).await.map_err(|e| {
        tracing::error!("Failed to list meal entries: {e}");
        AppError::database("Failed to fetch meal entries")
    })?;
    Ok(Json(entries))
}

/// GET /api/admin/payments
pub async fn list_payments(State(state): State<AppState>) -> ApiResult<Vec<Payment>> {
    let payments = db::payments::list_all(&state.pool).await.map_err(|e| {
        tracing::error!("Failed to list payments: {e}");
        AppError::database("Failed to fetch payments")
    })?;
    Ok(Json(payments))
}

/// GET /api/admin/feedback
pub async fn list_feedback(State(state): State<AppState>) -> ApiResult<Vec<Feedback>> {
    let feedback = db::feedback::list_all(&state.pool).await.map_err(|e| {
        tracing::error!("Failed to list feedback: {e}");
        AppError::database("Failed to fetch feedback")
    })?;
    Ok(Json(feedback))
}
