//! Date shape classification and lenient date parsing.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use regex::Regex;

use crate::numeric::parse_f64;

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4})[-/](\d{1,2})[-/](\d{1,2})(?:[T ]\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:Z|[+-]\d{2}:?\d{2})?)?$",
    )
    .expect("iso date regex")
});

static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})([/.-])(\d{1,2})[/.-](\d{4})$").expect("numeric date regex")
});

static TEXT_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[A-Za-z]{3,9}\.?\s+\d{1,2}(?:st|nd|rd|th)?,?\s+\d{4}|\d{1,2}(?:st|nd|rd|th)?[\s-][A-Za-z]{3,9}\.?[\s,-]+\d{4})$",
    )
    .expect("text date regex")
});

static ORDINAL_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d)(?:st|nd|rd|th)\b").expect("ordinal regex"));

/// Spreadsheet serial day numbers count from this date.
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);
const MAX_SERIAL: f64 = 2_958_465.0;

/// Format bucket a date-like value falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DateShape {
    /// `2024-01-31`, optionally with a time part.
    Iso,
    /// `01/31/2024`: month first.
    Us,
    /// `31/01/2024`, `31.01.2024`, `31-01-2024`: day first.
    Eu,
    /// `Jan 31, 2024`, `31 January 2024`.
    Text,
    /// Spreadsheet serial day number.
    Serial,
    Unknown,
}

impl DateShape {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Iso => "ISO",
            Self::Us => "US",
            Self::Eu => "EU",
            Self::Text => "text",
            Self::Serial => "serial",
            Self::Unknown => "unknown",
        }
    }
}

/// Classifies a trimmed date-like value.
///
/// Numeric dates with an ambiguous day/month are `Us` for `/` and `Eu`
/// for `.` or `-` separators.
pub fn classify_date(raw: &str) -> DateShape {
    let value = raw.trim();
    if ISO_DATE.is_match(value) {
        return DateShape::Iso;
    }
    if let Some(caps) = NUMERIC_DATE.captures(value) {
        let first: u32 = caps[1].parse().unwrap_or(0);
        let second: u32 = caps[3].parse().unwrap_or(0);
        return if first > 12 {
            DateShape::Eu
        } else if second > 12 || &caps[2] == "/" {
            DateShape::Us
        } else {
            DateShape::Eu
        };
    }
    if TEXT_DATE.is_match(value) {
        return DateShape::Text;
    }
    if parse_f64(value).is_some() {
        return DateShape::Serial;
    }
    DateShape::Unknown
}

/// Parses a date in any supported shape; ambiguous numeric dates are read
/// day-first when `day_first` is set, month-first otherwise.
pub fn parse_date_with(raw: &str, day_first: bool) -> Option<NaiveDate> {
    let value = raw.trim();
    if let Some(caps) = ISO_DATE.captures(value) {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
            return Some(parsed.with_timezone(&Utc).date_naive());
        }
        return NaiveDate::from_ymd_opt(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        );
    }
    if let Some(caps) = NUMERIC_DATE.captures(value) {
        let first: u32 = caps[1].parse().ok()?;
        let second: u32 = caps[3].parse().ok()?;
        let year: i32 = caps[4].parse().ok()?;
        let (day, month) = if first > 12 || (day_first && second <= 12) {
            (first, second)
        } else {
            (second, first)
        };
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    if TEXT_DATE.is_match(value) {
        return parse_text_date(value);
    }
    parse_f64(value).and_then(serial_to_date)
}

/// [`parse_date_with`], month-first for ambiguous numeric dates.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    parse_date_with(raw, false)
}

fn parse_text_date(value: &str) -> Option<NaiveDate> {
    let stripped = ORDINAL_SUFFIX.replace_all(value, "$1");
    let cleaned = stripped
        .replace([',', '.'], " ")
        .replace('-', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    ["%B %d %Y", "%d %B %Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&cleaned, format).ok())
}

/// Converts a spreadsheet serial day number to a date.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !(1.0..=MAX_SERIAL).contains(&serial) {
        return None;
    }
    let (year, month, day) = SERIAL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(year, month, day)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}
