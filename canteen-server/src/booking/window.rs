//! Booking and cancellation windows in the business timezone

use chrono::{DateTime, Datelike, Days, NaiveDate, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use shared::error::{AppError, ErrorCode};

#[derive(Debug, Clone, Copy)]
pub struct BookingWindow {
    pub tz: Tz,
    /// Same-day booking closes at this local hour
    pub booking_cutoff_hour: u32,
    /// Same-day cancellation closes at this local hour (unset = no cutoff)
    pub cancellation_cutoff_hour: Option<u32>,
}

impl BookingWindow {
    /// Calendar date of `now` in the business timezone
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.tz).date_naive()
    }

    fn local_hour(&self, now: DateTime<Utc>) -> u32 {
        now.with_timezone(&self.tz).hour()
    }

    /// Last date open for booking: Friday of the current week, or of the
    /// next week from Thursday on. Weeks start on Monday.
    pub fn last_bookable(&self, now: DateTime<Utc>) -> NaiveDate {
        let today = self.today(now);
        let weekday = today.weekday();
        let monday = today - Days::new(u64::from(weekday.num_days_from_monday()));
        let friday = monday + Days::new(4);
        if weekday.num_days_from_monday() >= Weekday::Thu.num_days_from_monday() {
            friday + Days::new(7)
        } else {
            friday
        }
    }

    /// A meal may be booked for a weekday that is after today, or today
    /// before the cutoff hour, up to [`Self::last_bookable`].
    pub fn check_bookable(&self, date: NaiveDate, now: DateTime<Utc>) -> Result<(), AppError> {
        let today = self.today(now);
        let date_str = date.to_string();

        if date < today {
            return Err(AppError::booking_window_closed(
                &date_str,
                format!("Cannot book meals for past date {date_str}"),
            ));
        }
        if date == today && self.local_hour(now) >= self.booking_cutoff_hour {
            return Err(AppError::booking_window_closed(
                &date_str,
                format!(
                    "Same-day booking closes at {:02}:00",
                    self.booking_cutoff_hour
                ),
            ));
        }
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return Err(AppError::booking_window_closed(
                &date_str,
                format!("Meals are not served on {}", date.weekday()),
            ));
        }
        let last = self.last_bookable(now);
        if date > last {
            return Err(AppError::booking_window_closed(
                &date_str,
                format!("Booking is open up to {last}"),
            ));
        }
        Ok(())
    }

    /// Past meals can never be cancelled; same-day cancellation only before
    /// the optional cutoff.
    pub fn check_cancellable(&self, date: NaiveDate, now: DateTime<Utc>) -> Result<(), AppError> {
        let today = self.today(now);
        if date < today {
            return Err(
                AppError::new(ErrorCode::CannotCancelPastMeal).with_detail("date", date.to_string())
            );
        }
        if let Some(cutoff) = self.cancellation_cutoff_hour
            && date == today
            && self.local_hour(now) >= cutoff
        {
            return Err(AppError::with_message(
                ErrorCode::CancellationWindowClosed,
                format!("Same-day cancellations are only allowed before {cutoff:02}:00."),
            ));
        }
        Ok(())
    }
}
