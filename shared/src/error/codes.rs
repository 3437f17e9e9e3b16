//! Unified error codes for the canteen service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 4xxx: Booking errors
//! - 5xxx: Payment and points errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Too many requests from one client
    TooManyRequests = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 4xxx: Booking ====================
    /// Meal entry not found
    MealEntryNotFound = 4001,
    /// An entry already exists for one of the requested dates
    DuplicateBooking = 4002,
    /// Booking request contains no entries
    NoEntriesSelected = 4003,
    /// Requested date is outside the booking window
    BookingWindowClosed = 4004,
    /// Entry date lies in the past and cannot be cancelled
    CannotCancelPastMeal = 4005,
    /// Same-day cancellation cutoff has passed
    CancellationWindowClosed = 4006,
    /// Meal entry has already been redeemed
    MealAlreadyRedeemed = 4007,
    /// Drafts in one booking belong to different employees
    MixedEmployeeBooking = 4008,

    // ==================== 5xxx: Payment ====================
    /// Insufficient payment amount
    PaymentInsufficientAmount = 5002,
    /// Gateway signature did not match
    PaymentSignatureMismatch = 5003,
    /// Gateway order is unknown to this service
    PaymentOrderNotFound = 5004,
    /// Gateway rejected or failed to create an order
    PaymentGatewayError = 5005,
    /// Not enough reward points
    InsufficientPoints = 5101,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::TooManyRequests => "Too many requests, try again later",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Booking
            ErrorCode::MealEntryNotFound => "Invalid QR Code: Entry not found.",
            ErrorCode::DuplicateBooking => "An entry already exists for the selected date",
            ErrorCode::NoEntriesSelected => "Please select at least one date.",
            ErrorCode::BookingWindowClosed => "Booking is closed for the selected date",
            ErrorCode::CannotCancelPastMeal => "You cannot cancel past meals.",
            ErrorCode::CancellationWindowClosed => "Same-day cancellation is closed",
            ErrorCode::MealAlreadyRedeemed => "This QR Code has already been used.",
            ErrorCode::MixedEmployeeBooking => "All entries must belong to one employee",

            // Payment
            ErrorCode::PaymentInsufficientAmount => "Insufficient payment amount",
            ErrorCode::PaymentSignatureMismatch => {
                "Payment verification failed. Invalid signature."
            }
            ErrorCode::PaymentOrderNotFound => "Payment order not found",
            ErrorCode::PaymentGatewayError => "Something went wrong while creating order",
            ErrorCode::InsufficientPoints => "Insufficient points",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::TooManyRequests),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Booking
            4001 => Ok(ErrorCode::MealEntryNotFound),
            4002 => Ok(ErrorCode::DuplicateBooking),
            4003 => Ok(ErrorCode::NoEntriesSelected),
            4004 => Ok(ErrorCode::BookingWindowClosed),
            4005 => Ok(ErrorCode::CannotCancelPastMeal),
            4006 => Ok(ErrorCode::CancellationWindowClosed),
            4007 => Ok(ErrorCode::MealAlreadyRedeemed),
            4008 => Ok(ErrorCode::MixedEmployeeBooking),

            // Payment
            5002 => Ok(ErrorCode::PaymentInsufficientAmount),
            5003 => Ok(ErrorCode::PaymentSignatureMismatch),
            5004 => Ok(ErrorCode::PaymentOrderNotFound),
            5005 => Ok(ErrorCode::PaymentGatewayError),
            5101 => Ok(ErrorCode::InsufficientPoints),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
