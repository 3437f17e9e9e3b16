//! HTTP routes for the canteen service

pub mod admin;
pub mod feedback;
pub mod health;
pub mod meals;
pub mod payments;
pub mod points;
pub mod reports;

use axum::routing::{delete, get, post};
use axum::{Router, middleware};
use shared::error::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::admin_auth::admin_auth_middleware;
use crate::auth::rate_limit::login_rate_limit;
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

/// Create the combined router
pub fn router(state: AppState) -> Router {
    // Employee-facing booking flow (no auth)
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/meals", get(meals::list).post(meals::create))
        .route("/api/meals/{id}", delete(meals::cancel))
        .route("/api/points", get(points::balance))
        .route("/api/payments/order", post(payments::create_order))
        .route("/api/payments/verify", post(payments::verify))
        .route("/api/feedback", post(feedback::submit));

    // Admin login (rate limited per IP)
    let login = Router::new()
        .route("/api/admin/login", post(admin::login))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            login_rate_limit,
        ));

    // Admin console (JWT authenticated)
    let console = Router::new()
        .route("/api/admin/redeem", post(admin::redeem))
        .route("/api/admin/meals", get(admin::list_meals))
        .route("/api/admin/payments", get(admin::list_payments))
        .route("/api/admin/feedback", get(admin::list_feedback))
        .route("/api/admin/reports/daily", get(reports::daily))
        .route("/api/admin/reports/redemptions", get(reports::redemptions))
        .route("/api/admin/reports/daily.csv", get(reports::daily_csv))
        .route("/api/admin/reports/payments.csv", get(reports::payments_csv))
        .route("/api/admin/reports/feedback.csv", get(reports::feedback_csv))
        .route(
            "/api/admin/reports/redemptions.csv",
            get(reports::redemptions_csv),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    Router::new()
        .merge(public)
        .merge(login)
        .merge(console)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
