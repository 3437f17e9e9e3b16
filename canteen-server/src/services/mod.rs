//! Transactional operations of the booking engine
//!
//! Each operation takes the current instant explicitly; handlers pass
//! `Utc::now()`.

pub mod booking;
pub mod cancellation;
pub mod payment;
pub mod redemption;

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{DateTime, TimeZone, Utc};
    use shared::models::{MealEntryDraft, MealType};

    use crate::config::Config;
    use crate::state::AppState;

    pub async fn state() -> AppState {
        let pool = crate::db::memory_pool().await.unwrap();
        AppState::with_pool(&Config::for_tests("sqlite::memory:"), pool)
    }

    /// Kolkata wall-clock time as a UTC instant
    pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        chrono_tz::Asia::Kolkata
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    /// Monday 2025-01-06, 07:00 in Kolkata
    pub fn monday_morning() -> DateTime<Utc> {
        at(2025, 1, 6, 7)
    }

    pub fn draft(employee_id: &str, date: &str, meal_type: MealType) -> MealEntryDraft {
        MealEntryDraft {
            date: date.to_string(),
            employee_id: employee_id.to_string(),
            employee_name: "Asha Rao".to_string(),
            vertical: "Operations".to_string(),
            reporting_manager: "Ravi Kumar".to_string(),
            location: "Pune".to_string(),
            shift_timings: "09:00-18:00".to_string(),
            meal_type,
        }
    }
}
