//! Numeric parsing helpers.

use std::sync::LazyLock;

use regex::Regex;
use tidy_model::CellValue;

static NUMERIC_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9,.\s-]+$").expect("numeric string regex"));

/// Parses a string as `f64`, returning `None` for invalid, empty or
/// non-finite values.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses after discarding every character other than digits, `.` and `-`,
/// so `"$1,234.50"` reads as `1234.5`.
pub fn parse_lenient(value: &str) -> Option<f64> {
    let kept: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
        .collect();
    parse_f64(&kept)
}

/// Strict numeric reading of a cell: numbers and plainly numeric text.
pub fn cell_number(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(number) if number.is_finite() => Some(*number),
        CellValue::Text(text) => parse_f64(text),
        _ => None,
    }
}

/// Lenient numeric reading of a cell, see [`parse_lenient`].
pub fn cell_number_lenient(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(number) if number.is_finite() => Some(*number),
        CellValue::Text(text) => parse_lenient(text),
        _ => None,
    }
}

/// Value of a numeric-looking string (digits, separators, sign) such as
/// `"1,200"` or `" 42 "`. Strings with other characters yield `None`.
pub fn numeric_string_value(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !NUMERIC_STRING.is_match(trimmed) {
        return None;
    }
    parse_f64(&trimmed.replace(',', ""))
}

/// Rounds half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
