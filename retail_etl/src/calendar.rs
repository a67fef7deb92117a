//! Date parsing and calendar attribute helpers.
//!
//! Accepted input forms, tried in order:
//! - `YYYY-MM-DD`
//! - `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DDTHH:MM:SS`
//! - RFC 3339 with an offset (the date part is taken as written)
//!
//! Anything else, or a year outside [`DATE_KEY_YEARS`], parses to `None`;
//! callers decide whether that is a coercion or an error.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Weekday};

use crate::keys::DATE_KEY_YEARS;

/// Parse a calendar date from one of the accepted forms.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    parse_any_date(s.trim()).filter(|d| DATE_KEY_YEARS.contains(&d.year()))
}

fn parse_any_date(s: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Day of week with Monday = 0 … Sunday = 6.
pub fn day_of_week(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}

/// Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Calendar quarter 1..=4.
pub fn quarter(date: NaiveDate) -> u32 {
    date.month0() / 3 + 1
}

/// English day name, e.g. "Saturday".
pub fn day_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

/// English month name, e.g. "March".
pub fn month_name(date: NaiveDate) -> String {
    date.format("%B").to_string()
}

/// Parse the leading `YYYY-MM` of a year-month label into `(year, month)`.
///
/// `"2022-03"` -> `Some((2022, 3))`; a month outside 1..=12 or a year outside
/// [`DATE_KEY_YEARS`] is rejected.
pub fn parse_year_month(s: &str) -> Option<(i32, u32)> {
    let s = s.trim();
    let year: i32 = s.get(0..4)?.parse().ok()?;
    let month: u32 = s.get(5..7)?.parse().ok()?;
    let valid = DATE_KEY_YEARS.contains(&year) && (1..=12).contains(&month);
    valid.then_some((year, month))
}
