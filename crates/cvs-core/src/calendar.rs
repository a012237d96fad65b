//! # Calendar Arithmetic
//!
//! Pure year/month/day arithmetic on UTC calendar days, plus the window
//! comparison used by every "within two months" rule.
//!
//! Year and month additions clamp to the last valid day of the target month:
//! 29 February 2020 plus one year is 28 February 2021, and 31 January plus
//! one month is the last day of February. Arithmetic that would leave the
//! representable range saturates at the input date.

use chrono::{Datelike, Days, Months, NaiveDate};

/// Boundary semantics of a date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Window {
    /// `[start, end)`: start inclusive, end exclusive.
    HalfOpen,
    /// `[start, end]`: both ends inclusive.
    Closed,
}

/// `date` plus `years` calendar years.
pub fn add_years(date: NaiveDate, years: u32) -> NaiveDate {
    add_months(date, years.saturating_mul(12))
}

/// `date` plus `months` calendar months.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}

/// `date` minus `months` calendar months.
pub fn sub_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months)).unwrap_or(date)
}

/// `date` minus `days` days.
pub fn sub_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(date)
}

/// The last day of the month `date` falls in.
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let first = date.with_day(1).unwrap_or(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Whether `date` lies in the window from `start` to `end`.
pub fn is_within(date: NaiveDate, start: NaiveDate, end: NaiveDate, window: Window) -> bool {
    match window {
        Window::HalfOpen => start <= date && date < end,
        Window::Closed => start <= date && date <= end,
    }
}
