//! Payment gateway endpoints: order creation and verification callback

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use shared::models::{
    BookingRequest, CreateOrderResponse, PaymentVerification, VerificationOutcome,
};

use crate::services::payment;
use crate::state::AppState;

use super::ApiResult;

/// POST /api/payments/order
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<BookingRequest>,
) -> ApiResult<CreateOrderResponse> {
    let order = payment::create_order(&state, req, Utc::now()).await?;
    Ok(Json(order))
}

/// POST /api/payments/verify
pub async fn verify(
    State(state): State<AppState>,
    Json(req): Json<PaymentVerification>,
) -> ApiResult<VerificationOutcome> {
    let outcome = payment::verify_payment(&state, req, Utc::now()).await?;
    Ok(Json(outcome))
}
