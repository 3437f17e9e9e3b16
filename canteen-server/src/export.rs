//! CSV exports for the admin console
//!
//! Each builder renders one sheet in memory. Timestamps are shown in the
//! business timezone.

use chrono::DateTime;
use chrono_tz::Tz;
use shared::models::{Feedback, MealEntry, MealType, Payment};

const ENTRY_HEADER: [&str; 10] = [
    "Date",
    "Scanner ID",
    "Employee ID",
    "Employee Name",
    "Vertical",
    "Reporting Manager",
    "Location",
    "Shift Timings",
    "Meal Type",
    "Status",
];

fn local_time(millis: i64, tz: Tz) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|t| t.with_timezone(&tz).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Paise as rupees with two decimals
fn rupees(paise: i64) -> String {
    let sign = if paise < 0 { "-" } else { "" };
    let abs = paise.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

fn summary_row(label: &str, count: usize) -> [String; 10] {
    let mut row: [String; 10] = Default::default();
    row[7] = label.to_string();
    row[8] = count.to_string();
    row
}

/// Entries for one date followed by veg, non-veg and total counts
pub fn daily_entries(entries: &[MealEntry]) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(ENTRY_HEADER)?;
    for e in entries {
        wtr.write_record([
            e.date.as_str(),
            e.id.as_str(),
            e.employee_id.as_str(),
            e.employee_name.as_str(),
            e.vertical.as_str(),
            e.reporting_manager.as_str(),
            e.location.as_str(),
            e.shift_timings.as_str(),
            e.meal_type.as_str(),
            if e.is_redeemed { "Completed" } else { "Pending" },
        ])?;
    }

    let veg = entries
        .iter()
        .filter(|e| e.meal_type == MealType::Veg)
        .count();
    wtr.write_record([""; 10])?;
    wtr.write_record(summary_row("Total Veg:", veg))?;
    wtr.write_record(summary_row("Total Non-Veg:", entries.len() - veg))?;
    wtr.write_record(summary_row("Total Meals:", entries.len()))?;
    finish(wtr)
}

pub fn payments(payments: &[Payment], tz: Tz) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "Date",
        "Payment ID",
        "Order ID",
        "Employee ID",
        "Amount (INR)",
        "Created At",
    ])?;
    for p in payments {
        wtr.write_record([
            p.date.clone(),
            p.razorpay_payment_id.clone(),
            p.razorpay_order_id.clone(),
            p.employee_id.clone(),
            rupees(p.amount),
            local_time(p.created_at, tz),
        ])?;
    }
    finish(wtr)
}

/// Rating prints as `N/A` when absent
pub fn feedback(feedback: &[Feedback], tz: Tz) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["Date", "Category", "Rating", "Message"])?;
    for f in feedback {
        wtr.write_record([
            local_time(f.created_at, tz),
            f.category.clone().unwrap_or_default(),
            f.rating.map_or_else(|| "N/A".to_string(), |r| r.to_string()),
            f.message.clone(),
        ])?;
    }
    finish(wtr)
}

pub fn redemptions(entries: &[MealEntry], tz: Tz) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "Date",
        "Meal ID",
        "Employee ID",
        "Name",
        "Meal Type",
        "Redeemed At",
    ])?;
    for e in entries {
        wtr.write_record([
            e.date.clone(),
            e.id.clone(),
            e.employee_id.clone(),
            e.employee_name.clone(),
            e.meal_type.as_str().to_string(),
            e.redeemed_at
                .map_or_else(|| "N/A".to_string(), |t| local_time(t, tz)),
        ])?;
    }
    finish(wtr)
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, csv::Error> {
    wtr.into_inner().map_err(|e| e.into_error().into())
}
