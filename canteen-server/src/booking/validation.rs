//! Booking draft validation

use chrono::NaiveDate;
use shared::error::{AppError, ErrorCode};
use shared::models::MealEntryDraft;
use shared::util::parse_date;
use std::collections::HashSet;

/// Names, managers, locations
pub const MAX_TEXT_LEN: usize = 200;

/// Employee ids and shift labels
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Validate that a required string is non-empty and at most `max_len`
/// characters once trimmed.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::required_field(field));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Check one booking request and return its employee id with the parsed dates
///
/// All drafts must belong to one employee and name distinct dates.
pub fn validate_drafts(drafts: &[MealEntryDraft]) -> Result<(String, Vec<NaiveDate>), AppError> {
    let Some(first) = drafts.first() else {
        return Err(AppError::new(ErrorCode::NoEntriesSelected));
    };
    let employee_id = first.employee_id.trim().to_string();

    let mut seen = HashSet::with_capacity(drafts.len());
    let mut dates = Vec::with_capacity(drafts.len());
    for draft in drafts {
        validate_required_text(&draft.employee_id, "employeeId", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&draft.employee_name, "employeeName", MAX_TEXT_LEN)?;
        validate_required_text(&draft.vertical, "vertical", MAX_TEXT_LEN)?;
        validate_required_text(&draft.reporting_manager, "reportingManager", MAX_TEXT_LEN)?;
        validate_required_text(&draft.location, "location", MAX_TEXT_LEN)?;
        validate_required_text(&draft.shift_timings, "shiftTimings", MAX_SHORT_TEXT_LEN)?;

        if draft.employee_id.trim() != employee_id {
            return Err(AppError::new(ErrorCode::MixedEmployeeBooking)
                .with_detail("employeeId", draft.employee_id.clone()));
        }

        let date = parse_date(&draft.date).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::InvalidFormat,
                format!("Invalid date format: {}", draft.date),
            )
            .with_detail("field", "date")
        })?;
        if !seen.insert(date) {
            return Err(AppError::validation(format!("Date {date} is selected more than once"))
                .with_detail("date", date.to_string()));
        }
        dates.push(date);
    }

    Ok((employee_id, dates))
}
