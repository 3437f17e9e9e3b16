//! Meal pricing
//!
//! Non-veg is served on Wednesdays and Fridays only. Any other day is forced
//! to veg whatever the client asked for.

use chrono::{Datelike, NaiveDate, Weekday};
use shared::models::MealType;

/// Weekdays on which non-veg may be booked
pub const NON_VEG_DAYS: [Weekday; 2] = [Weekday::Wed, Weekday::Fri];

/// Per-meal prices in price units (1 point = 1 unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceList {
    pub veg: i64,
    pub non_veg: i64,
}

impl Default for PriceList {
    fn default() -> Self {
        Self {
            veg: 45,
            non_veg: 70,
        }
    }
}

impl PriceList {
    pub fn price(&self, meal_type: MealType) -> i64 {
        match meal_type {
            MealType::Veg => self.veg,
            MealType::NonVeg => self.non_veg,
        }
    }

    /// Resolve the requested type against the weekday rule and price it
    pub fn quote(&self, requested: MealType, date: NaiveDate) -> (MealType, i64) {
        let meal_type = effective_meal_type(requested, date);
        (meal_type, self.price(meal_type))
    }
}

/// Meal type actually served on `date`
pub fn effective_meal_type(requested: MealType, date: NaiveDate) -> MealType {
    match requested {
        MealType::NonVeg if NON_VEG_DAYS.contains(&date.weekday()) => MealType::NonVeg,
        _ => MealType::Veg,
    }
}

/// Gateway amount in minor currency units (paise)
pub fn to_minor_units(units: i64) -> i64 {
    units * 100
}
