//! # Temporal Types — UTC Date Provider
//!
//! Supplies "now" to the expiry engine and converts between the string
//! dates carried on submissions and the `NaiveDate` values the calendar
//! arithmetic runs on.
//!
//! ## Invariant
//!
//! Every date in this crate is a UTC calendar day. Inputs carrying an
//! explicit offset are converted to UTC before the day is taken; there is no
//! ambient timezone. Strategies receive "today" from a [`DateProvider`]
//! passed to them explicitly, so a frozen provider makes them deterministic.
//!
//! ## Epoch Values
//!
//! Two fixed dates have reserved meanings and must never be conflated:
//!
//! | Value | Date | Meaning |
//! |-------|------|---------|
//! | [`epoch_zero()`] | 1970-01-01 | Placeholder written by clients for "no date"; never a valid date. |
//! | [`no_history_sentinel()`] | 1970-02-01 | Returned by the history lookup when no qualifying expiry exists. |

use chrono::{DateTime, Months, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::CvsError;

/// Source of the current instant.
///
/// Implementations must be `Send + Sync` so a single provider can be shared
/// by concurrent orchestrations behind an `Arc`.
pub trait DateProvider: Send + Sync {
    /// The current instant, in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// The current UTC calendar day. This is the test date every strategy
    /// computes from.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDateProvider;

impl DateProvider for SystemDateProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Provider frozen at a fixed instant.
///
/// Used by tests, by the CLI's `--today` flag, and anywhere a replayed
/// submission must be evaluated as of its original test date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDateProvider {
    now: DateTime<Utc>,
}

impl FixedDateProvider {
    /// Freeze the provider at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Freeze the provider at midnight UTC on `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
        Self {
            now: Utc.from_utc_datetime(&midnight),
        }
    }

    /// Freeze the provider at a date given as `YYYY-MM-DD` or RFC 3339.
    ///
    /// # Errors
    ///
    /// Returns [`CvsError::InvalidDate`] when the input matches neither form.
    pub fn parse(s: &str) -> Result<Self, CvsError> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::new(dt.with_timezone(&Utc)));
        }
        parse_date(s)
            .map(Self::at_date)
            .ok_or_else(|| CvsError::InvalidDate {
                input: s.to_string(),
                reason: "expected YYYY-MM-DD or RFC 3339".to_string(),
            })
    }
}

impl DateProvider for FixedDateProvider {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

/// 1 January 1970, the placeholder clients send in place of a real date.
pub fn epoch_zero() -> NaiveDate {
    NaiveDate::default()
}

/// 1 February 1970, the "no qualifying history" marker.
pub fn no_history_sentinel() -> NaiveDate {
    epoch_zero() + Months::new(1)
}

/// Parse a submission date into a UTC calendar day.
///
/// Accepts, in order:
/// - RFC 3339 with any offset (`2019-04-02T10:15:00.000Z`, `2019-04-02T23:30:00-02:00`),
///   converted to UTC before the day is taken;
/// - a naive date-time (`2019-04-02T10:15:00`), read as UTC;
/// - a bare date (`2019-04-02`).
///
/// Returns `None` for anything else, including impossible calendar dates.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ndt.date());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Whether `value` holds a usable date: present, parseable, and not the
/// epoch-zero placeholder.
pub fn is_valid_date(value: Option<&str>) -> bool {
    value
        .and_then(parse_date)
        .is_some_and(|date| date != epoch_zero())
}

/// Render a calendar day as an ISO 8601 UTC timestamp at start of day
/// (e.g. `2021-01-31T00:00:00.000Z`).
pub fn to_iso8601(date: NaiveDate) -> String {
    format!("{}T00:00:00.000Z", date.format("%Y-%m-%d"))
}
