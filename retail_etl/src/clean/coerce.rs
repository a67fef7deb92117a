//! Value coercion for raw cells.
//!
//! A raw cell is *missing* when it is absent, blank, or one of the usual null
//! spellings (`NA`, `N/A`, `NaN`, `null`, `None`). Missing cells may be filled
//! with a default; present cells that fail to parse become `None` and are
//! counted on the [`Coercer`].

use chrono::NaiveDate;

use crate::calendar;

const NULL_SPELLINGS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

/// `2^63`; integral floats in `-2^63..2^63` convert to `i64` exactly.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Returns the trimmed cell, or `None` when the cell counts as missing.
pub(crate) fn present(raw: Option<&str>) -> Option<&str> {
    let s = raw?.trim();
    if s.is_empty() || NULL_SPELLINGS.contains(&s) {
        None
    } else {
        Some(s)
    }
}

/// Round half away from zero to 2 decimals.
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Parses cells, counting values that were present but unparseable.
#[derive(Debug, Default)]
pub(crate) struct Coercer {
    pub(crate) coerced: usize,
}

impl Coercer {
    fn miss<T>(&mut self) -> Option<T> {
        self.coerced += 1;
        None
    }

    /// Text with surrounding whitespace removed.
    pub(crate) fn trimmed(&self, raw: Option<&str>) -> Option<String> {
        present(raw).map(str::to_owned)
    }

    /// Trimmed, upper-cased text.
    pub(crate) fn upper(&self, raw: Option<&str>) -> Option<String> {
        present(raw).map(str::to_uppercase)
    }

    /// Identifier; missing becomes the empty string.
    pub(crate) fn id(&self, raw: Option<&str>) -> String {
        present(raw).unwrap_or_default().to_owned()
    }

    pub(crate) fn number(&mut self, raw: Option<&str>) -> Option<f64> {
        match present(raw) {
            None => None,
            Some(s) => match s.parse::<f64>() {
                Ok(v) if v.is_finite() => Some(v),
                _ => self.miss(),
            },
        }
    }

    pub(crate) fn number_or(&mut self, raw: Option<&str>, default: f64) -> Option<f64> {
        match present(raw) {
            None => Some(default),
            some => self.number(some),
        }
    }

    /// Integer; integral floats such as `"3.0"` are accepted.
    pub(crate) fn integer(&mut self, raw: Option<&str>) -> Option<i64> {
        let s = present(raw)?;
        if let Ok(v) = s.parse::<i64>() {
            return Some(v);
        }
        match s.parse::<f64>() {
            Ok(v) if v.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&v) => Some(v as i64),
            _ => self.miss(),
        }
    }

    pub(crate) fn integer_or(&mut self, raw: Option<&str>, default: i64) -> Option<i64> {
        match present(raw) {
            None => Some(default),
            some => self.integer(some),
        }
    }

    /// Non-negative integer that fits `u32`.
    pub(crate) fn count_or(&mut self, raw: Option<&str>, default: u32) -> Option<u32> {
        match self.integer_or(raw, i64::from(default)) {
            Some(v) => match u32::try_from(v) {
                Ok(v) => Some(v),
                Err(_) => self.miss(),
            },
            None => None,
        }
    }

    pub(crate) fn date(&mut self, raw: Option<&str>) -> Option<NaiveDate> {
        let s = present(raw)?;
        calendar::parse_date(s).or_else(|| self.miss())
    }

    pub(crate) fn year_month(&mut self, raw: Option<&str>) -> Option<(i32, u32)> {
        let s = present(raw)?;
        calendar::parse_year_month(s).or_else(|| self.miss())
    }

    /// Keeps values inside `range`; values outside are coerced to `None`.
    pub(crate) fn bounded(
        &mut self,
        value: Option<f64>,
        range: std::ops::RangeInclusive<f64>,
    ) -> Option<f64> {
        match value {
            Some(v) if !range.contains(&v) => self.miss(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_spellings() {
        assert_eq!(present(None), None);
        assert_eq!(present(Some("")), None);
        assert_eq!(present(Some("   ")), None);
        assert_eq!(present(Some("NaN")), None);
        assert_eq!(present(Some("N/A")), None);
        assert_eq!(present(Some(" x ")), Some("x"));
    }

    #[test]
    fn defaults_fill_missing_but_not_garbage() {
        let mut c = Coercer::default();
        assert_eq!(c.number_or(None, 0.0), Some(0.0));
        assert_eq!(c.number_or(Some("12.5"), 0.0), Some(12.5));
        assert_eq!(c.number_or(Some("abc"), 0.0), None);
        assert_eq!(c.integer_or(Some(""), 1), Some(1));
        assert_eq!(c.integer_or(Some("3.0"), 1), Some(3));
        assert_eq!(c.integer_or(Some("3.5"), 1), None);
        assert_eq!(c.count_or(Some("-2"), 1), None);
        assert_eq!(c.coerced, 3);
    }

    #[test]
    fn out_of_range_integers_are_coerced() {
        let mut c = Coercer::default();
        assert_eq!(c.integer(Some("1e30")), None);
        assert_eq!(c.integer(Some("-1e19")), None);
        assert_eq!(c.integer(Some("inf")), None);
        assert_eq!(c.integer(Some("1e3")), Some(1000));
        assert_eq!(c.integer(Some("-9223372036854775808")), Some(i64::MIN));
        assert_eq!(c.coerced, 3);
    }

    #[test]
    fn missing_year_month_is_not_a_coercion() {
        let mut c = Coercer::default();
        assert_eq!(c.year_month(None), None);
        assert_eq!(c.year_month(Some("  ")), None);
        assert_eq!(c.year_month(Some("2022-03")), Some((2022, 3)));
        assert_eq!(c.coerced, 0);
        assert_eq!(c.year_month(Some("March 2022")), None);
        assert_eq!(c.coerced, 1);
    }

    #[test]
    fn dates_and_bounds() {
        let mut c = Coercer::default();
        assert!(c.date(Some("2022-05-06")).is_some());
        assert_eq!(c.date(Some("yesterday")), None);
        assert_eq!(c.date(None), None);
        assert_eq!(c.bounded(Some(5.5), 1.0..=5.0), None);
        assert_eq!(c.bounded(Some(4.2), 1.0..=5.0), Some(4.2));
        assert_eq!(c.coerced, 2);
    }

    #[test]
    fn rounding() {
        assert_eq!(round2(33.333_333), 33.33);
        assert_eq!(round2(-1.005_1), -1.01);
    }
}
