//! Batch planning: pricing, points clamp and entry materialization

use chrono::NaiveDate;
use shared::models::{
    BookingQuote, MealEntry, MealEntryDraft, MealType, PaymentMethod, PricedEntry,
};
use uuid::Uuid;

use super::pricing::PriceList;

/// Namespace for deterministic meal entry ids
const ENTRY_NAMESPACE: Uuid = Uuid::from_u128(0x6d1f_2c8a_4b3e_5f70_9a1d_0c2e_7b48_3f15);

/// Deterministic entry id for one date of one batch
///
/// The batch key is the gateway order id for paid bookings, so a replayed
/// callback reproduces the same ids.
pub fn entry_id(batch_key: &str, employee_id: &str, date: &str) -> String {
    Uuid::new_v5(
        &ENTRY_NAMESPACE,
        format!("{batch_key}/{employee_id}/{date}").as_bytes(),
    )
    .to_string()
}

/// Points actually spent: never more than requested, held, or owed
pub fn clamp_points(requested: i64, balance: i64, total_cost: i64) -> i64 {
    requested.min(balance).min(total_cost).max(0)
}

/// One draft after the weekday rule and pricing
#[derive(Debug, Clone)]
pub struct PlannedEntry {
    pub draft: MealEntryDraft,
    pub meal_type: MealType,
    pub price: i64,
}

/// Priced batch for one employee
#[derive(Debug, Clone)]
pub struct BatchPlan {
    pub employee_id: String,
    pub entries: Vec<PlannedEntry>,
    pub total_cost: i64,
    pub points_redeemed: i64,
    /// Balance the clamp was computed against
    pub balance: i64,
}

/// Price the drafts and clamp the requested points
///
/// Drafts must already be validated and filtered against existing bookings.
pub fn plan_batch(
    prices: &PriceList,
    employee_id: &str,
    drafts: Vec<(MealEntryDraft, NaiveDate)>,
    requested_points: i64,
    balance: i64,
) -> BatchPlan {
    let entries: Vec<PlannedEntry> = drafts
        .into_iter()
        .map(|(draft, date)| {
            let (meal_type, price) = prices.quote(draft.meal_type, date);
            PlannedEntry {
                draft,
                meal_type,
                price,
            }
        })
        .collect();
    let total_cost = entries.iter().map(|e| e.price).sum();
    let points_redeemed = clamp_points(requested_points, balance, total_cost);

    BatchPlan {
        employee_id: employee_id.to_string(),
        entries,
        total_cost,
        points_redeemed,
        balance,
    }
}

impl BatchPlan {
    /// Amount still owed after points, in price units
    pub fn payable(&self) -> i64 {
        self.total_cost - self.points_redeemed
    }

    pub fn remaining_points(&self) -> i64 {
        self.balance - self.points_redeemed
    }

    pub fn quote(&self) -> BookingQuote {
        BookingQuote {
            total_cost: self.total_cost,
            points_redeemed: self.points_redeemed,
            payable: self.payable(),
            remaining_points: self.remaining_points(),
            entries: self
                .entries
                .iter()
                .map(|e| PricedEntry {
                    date: e.draft.date.trim().to_string(),
                    meal_type: e.meal_type,
                    price: e.price,
                })
                .collect(),
        }
    }

    /// Turn the plan into rows ready to insert
    ///
    /// The first `points_redeemed` entries in input order are marked as paid
    /// by points, the rest with `remainder`.
    pub fn into_entries(
        self,
        batch_key: &str,
        remainder: PaymentMethod,
        now: i64,
    ) -> Vec<MealEntry> {
        let points = self.points_redeemed;
        let employee_id = self.employee_id;
        self.entries
            .into_iter()
            .enumerate()
            .map(|(index, e)| {
                let date = e.draft.date.trim().to_string();
                let payment_method = if (index as i64) < points {
                    PaymentMethod::Points
                } else {
                    remainder
                };
                MealEntry {
                    id: entry_id(batch_key, &employee_id, &date),
                    date,
                    employee_id: employee_id.clone(),
                    employee_name: e.draft.employee_name.trim().to_string(),
                    vertical: e.draft.vertical.trim().to_string(),
                    reporting_manager: e.draft.reporting_manager.trim().to_string(),
                    location: e.draft.location.trim().to_string(),
                    shift_timings: e.draft.shift_timings.trim().to_string(),
                    meal_type: e.meal_type,
                    payment_method,
                    is_redeemed: false,
                    redeemed_at: None,
                    created_at: now,
                }
            })
            .collect()
    }
}
