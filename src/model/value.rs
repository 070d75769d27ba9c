//! Scalar cell values and their canonical text form.
//!
//! Two datasets exported by different tools rarely agree on how a value is
//! spelled: one stores `2024-01-15` as a date cell, the other as text, one writes
//! `10`, the other `10.0`. Keys and comparisons therefore never look at the
//! native representation directly. They go through [`CellValue::canonical_string`]
//! and [`CellValue::equivalent`], which are stable across input formats.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single scalar cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Missing or null cell
    #[default]
    Empty,
    /// Free text, kept exactly as read
    Text(String),
    /// Any numeric cell
    Number(f64),
    /// Boolean cell
    Boolean(bool),
    /// Calendar date without time
    Date(NaiveDate),
    /// Time of day without date
    Time(NaiveTime),
    /// Date and time of day
    DateTime(NaiveDateTime),
}

/// The temporal reading of a cell, either native or parsed from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporal {
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

impl Temporal {
    /// Canonical rendering: `YYYY-MM-DD`, `HH:MM:SS`, or both separated by a
    /// space. Datetimes at midnight render as the bare date.
    #[must_use]
    pub fn canonical(&self) -> String {
        match self {
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::Time(t) => t.format("%H:%M:%S").to_string(),
            Self::DateTime(dt) => {
                if dt.time().num_seconds_from_midnight() == 0 && dt.time().nanosecond() == 0 {
                    dt.date().format("%Y-%m-%d").to_string()
                } else {
                    dt.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
        }
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

/// Parse text as a date, time or datetime using the recognised formats.
///
/// Day-first forms (`15/01/2024`) are preferred over month-first. Dates whose
/// year falls outside 1000..=9999 are rejected so that short codes like `1-2-3`
/// stay text.
#[must_use]
pub fn parse_temporal(text: &str) -> Option<Temporal> {
    let s = text.trim();
    if s.len() < 4 || !s.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    let plausible_year = |year: i32| (1000..=9999).contains(&year);

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            if plausible_year(dt.year()) {
                return Some(Temporal::DateTime(dt));
            }
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            if plausible_year(d.year()) {
                return Some(Temporal::Date(d));
            }
        }
    }
    if s.contains(':') {
        for fmt in TIME_FORMATS {
            if let Ok(t) = NaiveTime::parse_from_str(s, fmt) {
                return Some(Temporal::Time(t));
            }
        }
    }
    None
}

/// Render a number without locale formatting.
///
/// Integral values below 1e15 print without a fraction, everything else uses
/// the shortest representation that round-trips.
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }
    format!("{n}")
}

/// Tolerance applied when two values both read as numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericTolerance {
    pub absolute: f64,
    pub relative: f64,
}

impl Default for NumericTolerance {
    fn default() -> Self {
        Self {
            absolute: 1e-9,
            relative: 1e-9,
        }
    }
}

impl NumericTolerance {
    /// Exact comparison.
    #[must_use]
    pub const fn exact() -> Self {
        Self {
            absolute: 0.0,
            relative: 0.0,
        }
    }

    #[must_use]
    pub fn within(&self, a: f64, b: f64) -> bool {
        if a == b {
            return true;
        }
        let scale = a.abs().max(b.abs());
        (a - b).abs() <= self.absolute + self.relative * scale
    }
}

impl CellValue {
    /// Build a text cell.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Type a raw string the way delimited-text loaders do: blanks are empty,
    /// `true`/`false` are booleans, finite numbers are numbers, anything else
    /// is text.
    #[must_use]
    pub fn infer(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return Self::Empty;
        }
        if s.eq_ignore_ascii_case("true") {
            return Self::Boolean(true);
        }
        if s.eq_ignore_ascii_case("false") {
            return Self::Boolean(false);
        }
        if let Some(n) = parse_number(s) {
            return Self::Number(n);
        }
        Self::Text(raw.to_string())
    }

    /// True for `Empty` and whitespace-only text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Numeric reading of the cell, including numeric text.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Text(s) => parse_number(s.trim()),
            _ => None,
        }
    }

    /// Temporal reading of the cell, including date-like text.
    #[must_use]
    pub fn as_temporal(&self) -> Option<Temporal> {
        match self {
            Self::Date(d) => Some(Temporal::Date(*d)),
            Self::Time(t) => Some(Temporal::Time(*t)),
            Self::DateTime(dt) => Some(Temporal::DateTime(*dt)),
            Self::Text(s) => parse_temporal(s),
            _ => None,
        }
    }

    /// True for native date, time and datetime cells.
    #[must_use]
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date(_) | Self::Time(_) | Self::DateTime(_))
    }

    /// Type-stable string form used for keys and as the last-resort equality.
    ///
    /// Date-like text renders as its temporal canonical form and numeric text
    /// as its number, so a value reads the same whatever cell type it came in.
    #[must_use]
    pub fn canonical_string(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => {
                let trimmed = s.trim();
                if let Some(t) = parse_temporal(trimmed) {
                    t.canonical()
                } else if let Some(n) = parse_number(trimmed) {
                    format_number(n)
                } else {
                    trimmed.to_string()
                }
            }
            Self::Number(n) => format_number(*n),
            Self::Boolean(b) => b.to_string(),
            Self::Date(d) => Temporal::Date(*d).canonical(),
            Self::Time(t) => Temporal::Time(*t).canonical(),
            Self::DateTime(dt) => Temporal::DateTime(*dt).canonical(),
        }
    }

    /// Logical equality between two cells.
    ///
    /// Blank equals blank; numbers (or numeric text) compare within `tolerance`;
    /// dates and times compare by canonical form; everything else compares by
    /// canonical string.
    #[must_use]
    pub fn equivalent(&self, other: &Self, tolerance: &NumericTolerance) -> bool {
        match (self.is_blank(), other.is_blank()) {
            (true, true) => return true,
            (true, false) | (false, true) => return false,
            (false, false) => {}
        }
        if let (Self::Boolean(a), Self::Boolean(b)) = (self, other) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return tolerance.within(a, b);
        }
        if let (Some(a), Some(b)) = (self.as_temporal(), other.as_temporal()) {
            return a.canonical() == b.canonical();
        }
        self.canonical_string() == other.canonical_string()
    }
}

fn parse_number(s: &str) -> Option<f64> {
    // f64::from_str also accepts "inf" and "NaN", which are text here
    if !s.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_string())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveTime> for CellValue {
    fn from(t: NaiveTime) -> Self {
        Self::Time(t)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

// ============================================================================
// Serde: cells serialize as plain JSON scalars
// ============================================================================

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_none(),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            Self::Number(n) => serializer.serialize_str(&format_number(*n)),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::Date(_) | Self::Time(_) | Self::DateTime(_) => {
                serializer.serialize_str(&self.canonical_string())
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<RawScalar>::deserialize(deserializer)? {
            None => Self::Empty,
            Some(RawScalar::Bool(b)) => Self::Boolean(b),
            Some(RawScalar::Number(n)) => Self::Number(n),
            Some(RawScalar::Text(s)) => Self::Text(s),
        })
    }
}
