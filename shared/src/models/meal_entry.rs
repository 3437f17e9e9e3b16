//! Meal Entry Model

use serde::{Deserialize, Serialize};

/// Meal type requested for a day
///
/// Non-veg is only served on Wednesdays and Fridays; the server decides the
/// final type at booking time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum MealType {
    #[default]
    Veg,
    #[serde(rename = "Non-Veg", alias = "NonVeg", alias = "Non_Veg")]
    NonVeg,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Veg => "Veg",
            Self::NonVeg => "Non-Veg",
        }
    }
}

/// How a single entry was paid for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum PaymentMethod {
    /// Fully covered at booking time without the gateway
    Standard,
    /// Covered by reward points
    Points,
    /// Paid through the payment gateway
    Online,
}

/// Meal entry - one employee's booking for one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MealEntry {
    pub id: String,
    /// Calendar date (YYYY-MM-DD)
    pub date: String,
    pub employee_id: String,
    pub employee_name: String,
    pub vertical: String,
    pub reporting_manager: String,
    pub location: String,
    pub shift_timings: String,
    pub meal_type: MealType,
    pub payment_method: PaymentMethod,
    pub is_redeemed: bool,
    /// Redemption time (Unix millis)
    pub redeemed_at: Option<i64>,
    pub created_at: i64,
}

/// Booking draft submitted by the client, one per date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealEntryDraft {
    pub date: String,
    pub employee_id: String,
    pub employee_name: String,
    pub vertical: String,
    pub reporting_manager: String,
    pub location: String,
    pub shift_timings: String,
    /// Advisory only
    #[serde(default)]
    pub meal_type: MealType,
}

/// Booking request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub entries: Vec<MealEntryDraft>,
    /// Points the employee wants to spend on this booking
    #[serde(default)]
    pub redeem_points: i64,
}

/// Draft after the server applied the weekday rule and priced it
///
/// Also stored per gateway order, as the set of dates the order pays for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PricedEntry {
    pub date: String,
    pub meal_type: MealType,
    pub price: i64,
}

/// Cost breakdown for a booking batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuote {
    pub total_cost: i64,
    pub points_redeemed: i64,
    /// Amount left to pay through the gateway (price units)
    pub payable: i64,
    /// Point balance after this booking is finalized
    pub remaining_points: i64,
    pub entries: Vec<PricedEntry>,
}

/// Result of a booking request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum BookingOutcome {
    /// Entries persisted immediately
    Booked {
        count: usize,
        entries: Vec<MealEntry>,
    },
    /// Gateway payment required before anything is persisted
    PaymentRequired { quote: BookingQuote },
}

/// Result of a cancellation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationOutcome {
    pub id: String,
    /// False when the entry was already gone
    pub cancelled: bool,
    pub points_credited: i64,
    pub message: String,
}

/// Redemption request (scanned QR payload or typed code)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemRequest {
    pub id: String,
}

/// Successful redemption
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemResponse {
    pub message: String,
    pub entry: MealEntry,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_type_wire_names() {
        assert_eq!(serde_json::to_string(&MealType::NonVeg).unwrap(), "\"Non-Veg\"");
        assert_eq!(serde_json::to_string(&MealType::Veg).unwrap(), "\"Veg\"");
        for name in ["\"Non-Veg\"", "\"NonVeg\"", "\"Non_Veg\""] {
            let parsed: MealType = serde_json::from_str(name).unwrap();
            assert_eq!(parsed, MealType::NonVeg);
        }
    }

    #[test]
    fn test_draft_defaults_to_veg() {
        let json = r#"{
            "date": "2025-01-06",
            "employeeId": "E100",
            "employeeName": "Asha",
            "vertical": "Ops",
            "reportingManager": "Ravi",
            "location": "Pune",
            "shiftTimings": "9-6"
        }"#;
        let draft: MealEntryDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.meal_type, MealType::Veg);
        assert_eq!(draft.employee_id, "E100");
    }

    #[test]
    fn test_booking_request_redeem_points_optional() {
        let req: BookingRequest = serde_json::from_str(r#"{"entries": []}"#).unwrap();
        assert_eq!(req.redeem_points, 0);
    }

    #[test]
    fn test_booking_outcome_tagged() {
        let outcome = BookingOutcome::PaymentRequired {
            quote: BookingQuote {
                total_cost: 115,
                points_redeemed: 0,
                payable: 115,
                remaining_points: 0,
                entries: vec![],
            },
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "paymentRequired");
        assert_eq!(json["quote"]["totalCost"], 115);

        let booked = BookingOutcome::Booked {
            count: 0,
            entries: vec![],
        };
        let json = serde_json::to_value(&booked).unwrap();
        assert_eq!(json["status"], "booked");
        assert_eq!(json["count"], 0);
    }
}
