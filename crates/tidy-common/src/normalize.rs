//! Value normalizer.
//!
//! Canonicalizes raw cell values for comparison. Every function here is
//! pure and treats absent values, blank strings and placeholder tokens
//! (`"-"`, `"n/a"`, `"none"`, ...) uniformly as empty.

use std::sync::LazyLock;

use regex::Regex;
use tidy_model::CellValue;

/// Tokens that stand in for "no value".
const EMPTY_TOKENS: &[&str] = &[
    "", "-", "--", "\u{2014}", "\u{2013}", "n/a", "na", "null", "nil", "none",
];

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}$").expect("email regex")
});

/// UTF-8 text that was decoded as Windows-1252 somewhere upstream:
/// `Ã©` for `é`, `â€™` for `’`, plus the replacement character.
static MOJIBAKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\x{FFFD}|â€|[ÃÂ][\x{80}-\x{BF}",
        r"\x{152}\x{153}\x{160}\x{161}\x{178}\x{17D}\x{17E}\x{192}\x{2C6}\x{2DC}",
        r"\x{2013}\x{2014}\x{2018}-\x{201E}\x{2020}-\x{2022}\x{2026}\x{2030}",
        r"\x{2039}\x{203A}\x{20AC}\x{2122}]",
    ))
    .expect("mojibake regex")
});

/// Zero-width and formatting characters that render as nothing.
pub fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{200B}'..='\u{200D}' | '\u{2060}' | '\u{FEFF}' | '\u{180E}'
    )
}

/// Removes zero-width characters, leaving visible text untouched.
pub fn strip_invisible(raw: &str) -> String {
    raw.chars().filter(|c| !is_invisible(*c)).collect()
}

/// Empty predicate for text.
pub fn is_empty_text(raw: &str) -> bool {
    let cleaned = strip_invisible(raw);
    let key = cleaned.trim().to_lowercase();
    EMPTY_TOKENS.contains(&key.as_str())
}

/// Empty predicate for a cell.
pub fn is_empty(value: &CellValue) -> bool {
    match value {
        CellValue::Missing => true,
        CellValue::Text(text) => is_empty_text(text),
        CellValue::Number(number) => number.is_nan(),
        CellValue::Bool(_) => false,
    }
}

/// Canonical comparison form of a value.
///
/// Drops zero-width characters, lower-cases, removes punctuation other
/// than `@ . -`, and collapses whitespace runs (unicode spaces included)
/// to single spaces.
pub fn normalize(raw: &str) -> String {
    if is_empty_text(raw) {
        return String::new();
    }
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if is_invisible(c) {
            continue;
        }
        if c.is_whitespace() {
            out.push(' ');
        } else if c.is_alphanumeric() || matches!(c, '@' | '.' | '-') {
            out.extend(c.to_lowercase());
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// [`normalize`] applied to a cell's text form; empty cells yield `""`.
pub fn normalize_cell(value: &CellValue) -> String {
    if is_empty(value) {
        return String::new();
    }
    normalize(&value.as_text())
}

/// Trimmed, lower-cased text form used to compare values case-insensitively.
pub fn fold_key(value: &CellValue) -> String {
    if is_empty(value) {
        return String::new();
    }
    strip_invisible(&value.as_text()).trim().to_lowercase()
}

/// Lower-case words of a column name, split on separators and camelCase
/// boundaries: `"customerId"` and `"customer_id"` both give
/// `["customer", "id"]`.
pub fn column_tokens(name: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for c in name.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Normalized tokens sorted lexicographically, so `"Smith, John"` and
/// `"john smith"` compare equal.
pub fn tokenize_sort(raw: &str) -> String {
    let normalized = normalize(raw);
    let mut tokens: Vec<&str> = normalized.split(' ').filter(|t| !t.is_empty()).collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Domain part of an email address, or `""` when absent or malformed.
pub fn extract_domain(email: &str) -> String {
    let cleaned = strip_invisible(email).trim().to_lowercase();
    let mut parts = cleaned.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None)
            if !local.is_empty()
                && !domain.is_empty()
                && !domain.chars().any(char::is_whitespace) =>
        {
            domain.to_string()
        }
        _ => String::new(),
    }
}

/// RFC-shaped email check on the lower-cased value.
///
/// Rejects consecutive dots, embedded spaces, leading/trailing dots and
/// anything but exactly one `@`.
pub fn is_valid_email(raw: &str) -> bool {
    let value = raw.trim().to_lowercase();
    if value.contains("..") || value.contains(' ') {
        return false;
    }
    if value.starts_with('.') || value.ends_with('.') {
        return false;
    }
    if value.matches('@').count() != 1 {
        return false;
    }
    EMAIL_SHAPE.is_match(&value)
}

/// Whether `text` carries double-encoding artifacts.
pub fn has_mojibake(text: &str) -> bool {
    MOJIBAKE.is_match(text)
}
