//! Payment Models (gateway orders and settled payments)

use serde::{Deserialize, Serialize};

use super::meal_entry::{BookingQuote, MealEntry, MealEntryDraft};

/// Settled gateway transaction (append-only)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: i64,
    /// Business date of the payment (YYYY-MM-DD)
    pub date: String,
    pub employee_id: String,
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    /// Minor currency units (paise)
    pub amount: i64,
    pub currency: String,
    pub created_at: i64,
}

/// Gateway order lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PaymentOrderStatus {
    Created,
    Paid,
}

/// Gateway order created by this service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PaymentOrder {
    pub order_id: String,
    pub employee_id: String,
    /// Minor currency units (paise)
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    /// Points the quote promised to spend
    pub points_redeemed: i64,
    pub status: PaymentOrderStatus,
    pub created_at: i64,
}

/// Gateway order response handed to the checkout widget
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: String,
    /// Minor currency units (paise)
    pub amount: i64,
    pub currency: String,
    /// Public gateway key id
    pub key: String,
    pub quote: BookingQuote,
}

/// Checkout callback payload plus the booking it pays for
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerification {
    #[serde(alias = "razorpay_order_id")]
    pub razorpay_order_id: String,
    #[serde(alias = "razorpay_payment_id")]
    pub razorpay_payment_id: String,
    #[serde(alias = "razorpay_signature")]
    pub razorpay_signature: String,
    /// Drafts being paid for; points come from the stored order
    pub entries: Vec<MealEntryDraft>,
}

/// Result of a verified payment callback
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum VerificationOutcome {
    /// Payment recorded and meals booked
    Booked {
        message: String,
        count: usize,
        entries: Vec<MealEntry>,
    },
    /// Payment recorded but every date was booked in the meantime
    NothingToBook { message: String },
    /// Callback replayed for a payment that is already recorded
    AlreadyProcessed { message: String },
}
