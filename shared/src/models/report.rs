//! Admin report models

use serde::{Deserialize, Serialize};

use super::meal_entry::MealEntry;

/// Kitchen headcount for one date
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMealReport {
    pub date: String,
    pub total: usize,
    pub veg: usize,
    pub non_veg: usize,
    pub redeemed: usize,
    pub pending: usize,
    pub entries: Vec<MealEntry>,
}

/// Redeemed entries, newest redemption first
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionReport {
    pub total: usize,
    pub entries: Vec<MealEntry>,
}
