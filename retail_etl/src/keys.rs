//! Surrogate keys, date keys, and the natural-key → surrogate-key map.
//!
//! - [`SurrogateKey`]: dense 1-based integer assigned by row position.
//! - [`DateKey`]: the 8-digit `YYYYMMDD` join key of the date dimension.
//! - [`KeyLookup`]: outcome of resolving a foreign key. Persisted as the key
//!   itself or as an empty (null) cell.
//! - [`KeyMap`]: built once per dimension build; never shared across builds.

use std::{collections::HashMap, fmt, ops::RangeInclusive};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Dense, 1-based synthetic row identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurrogateKey(u64);

impl SurrogateKey {
    /// Key for the row at 0-based `position` in an order-preserved table.
    pub const fn from_position(position: usize) -> Self {
        Self(position as u64 + 1)
    }

    /// Wraps a raw key value (e.g., one read back from disk).
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw integer value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SurrogateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Years a [`DateKey`] can represent.
pub const DATE_KEY_YEARS: RangeInclusive<i32> = 1000..=9999;

/// `YYYYMMDD` as an integer, e.g. 2022-03-01 -> `20220301`.
///
/// Only years in [`DATE_KEY_YEARS`] have a key, so ordering of date keys
/// matches calendar ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(u32);

impl DateKey {
    /// Date key of a calendar day; `None` for a year outside [`DATE_KEY_YEARS`].
    pub fn from_date(date: NaiveDate) -> Option<Self> {
        if !DATE_KEY_YEARS.contains(&date.year()) {
            return None;
        }
        let year = date.year().unsigned_abs();
        Some(Self(year * 10_000 + date.month() * 100 + date.day()))
    }

    /// Date key of the first day of `(year, month)`; `None` if the pair is not
    /// a real month or the year has no key.
    pub fn first_of_month(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).and_then(Self::from_date)
    }

    /// Raw integer value.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08}", self.0)
    }
}

/// Result of resolving a foreign key against a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyLookup<K> {
    /// The natural key matched exactly one dimension row.
    Resolved(K),
    /// No dimension row matched; persisted as null.
    Unmatched,
}

impl<K: Copy> KeyLookup<K> {
    /// The resolved key, if any.
    pub fn key(&self) -> Option<K> {
        match self {
            KeyLookup::Resolved(k) => Some(*k),
            KeyLookup::Unmatched => None,
        }
    }

    /// True for [`KeyLookup::Unmatched`].
    pub fn is_unmatched(&self) -> bool {
        matches!(self, KeyLookup::Unmatched)
    }
}

impl<K> From<Option<K>> for KeyLookup<K> {
    fn from(value: Option<K>) -> Self {
        match value {
            Some(k) => KeyLookup::Resolved(k),
            None => KeyLookup::Unmatched,
        }
    }
}

impl<K: Serialize> Serialize for KeyLookup<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            KeyLookup::Resolved(k) => serializer.serialize_some(k),
            KeyLookup::Unmatched => serializer.serialize_none(),
        }
    }
}

impl<'de, K: Deserialize<'de>> Deserialize<'de> for KeyLookup<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<K>::deserialize(deserializer).map(Into::into)
    }
}

/// Natural key -> surrogate key mapping for one dimension build.
///
/// When a natural key occurs more than once, the last occurrence wins and the
/// collision is counted in [`KeyMap::duplicates`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMap {
    keys: HashMap<String, SurrogateKey>,
    duplicates: usize,
}

impl KeyMap {
    /// Empty map sized for `n` entries.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            keys: HashMap::with_capacity(n),
            duplicates: 0,
        }
    }

    /// Records `natural -> key`, replacing an earlier mapping for the same natural key.
    pub fn insert(&mut self, natural: &str, key: SurrogateKey) {
        if self.keys.insert(natural.to_owned(), key).is_some() {
            self.duplicates += 1;
        }
    }

    /// Resolve a natural key. A missing natural key is always unmatched.
    pub fn lookup(&self, natural: Option<&str>) -> KeyLookup<SurrogateKey> {
        natural.and_then(|n| self.keys.get(n).copied()).into()
    }

    /// Number of distinct natural keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True if no keys were recorded.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of inserts that replaced an existing natural key.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}
