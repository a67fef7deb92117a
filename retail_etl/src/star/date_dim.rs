use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::calendar;
use crate::keys::{DateKey, KeyLookup, SurrogateKey};
use crate::models::star::DateRow;

/// The date dimension plus its `date_key` index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateDimension {
    pub rows: Vec<DateRow>,
    index: HashMap<DateKey, SurrogateKey>,
}

impl DateDimension {
    /// Index existing rows (e.g., loaded back from disk).
    pub fn from_rows(rows: Vec<DateRow>) -> Self {
        let index = rows.iter().map(|r| (r.date_key, r.date_id)).collect();
        Self { rows, index }
    }

    /// Resolve a date key; keys outside the dimension range are unmatched.
    pub fn resolve_key(&self, key: DateKey) -> KeyLookup<DateKey> {
        if self.index.contains_key(&key) {
            KeyLookup::Resolved(key)
        } else {
            KeyLookup::Unmatched
        }
    }

    /// Resolve a calendar day; a missing date or one without a date key is unmatched.
    pub fn resolve(&self, date: Option<NaiveDate>) -> KeyLookup<DateKey> {
        match date {
            Some(d) => DateKey::from_date(d)
                .map_or(KeyLookup::Unmatched, |k| self.resolve_key(k)),
            None => KeyLookup::Unmatched,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First and last day covered, if any.
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.rows.first()?.date, self.rows.last()?.date))
    }
}

fn date_row(position: usize, date: NaiveDate, date_key: DateKey) -> DateRow {
    DateRow {
        date_id: SurrogateKey::from_position(position),
        date,
        day: date.day(),
        month: date.month(),
        quarter: calendar::quarter(date),
        year: date.year(),
        day_of_week: calendar::day_of_week(date),
        day_name: calendar::day_name(date),
        month_name: calendar::month_name(date),
        is_weekend: calendar::is_weekend(date),
        date_key,
    }
}

/// One row per day in `start..=end`, ascending. Empty when `end < start`.
///
/// Days whose year has no [`DateKey`] are left out.
pub fn build_date_dimension(start: NaiveDate, end: NaiveDate) -> DateDimension {
    if end < start {
        warn!(%start, %end, "date range end precedes start; date dimension is empty");
        return DateDimension::default();
    }
    let mut skipped = 0usize;
    let rows: Vec<DateRow> = start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter_map(|d| match DateKey::from_date(d) {
            Some(key) => Some((d, key)),
            None => {
                skipped += 1;
                None
            }
        })
        .enumerate()
        .map(|(i, (d, key))| date_row(i, d, key))
        .collect();
    if skipped > 0 {
        warn!(%start, %end, skipped, "days outside the date key years left out of the date dimension");
    }
    DateDimension::from_rows(rows)
}
