//! Canonical formats for date, phone and email columns.

use tidy_common::{DateShape, classify_date, is_empty, is_valid_email, parse_date_with};
use tidy_model::{CellValue, Dataset};

pub const INVALID_PHONE: &str = "Invalid phone";
pub const INVALID_EMAIL: &str = "invalid_email";

/// Rewrites parseable dates as `YYYY-MM-DD`.
///
/// Ambiguous numeric dates are read day-first when the column holds more
/// unambiguous day-first values than month-first ones. Values that do not
/// parse are left as they are.
pub fn standardize_dates(dataset: &mut Dataset, column: &str) {
    let (mut eu, mut us) = (0usize, 0usize);
    for cell in dataset.column_values(column) {
        if let Some(text) = cell.as_str() {
            match classify_date(text) {
                DateShape::Eu => eu += 1,
                DateShape::Us => us += 1,
                _ => {}
            }
        }
    }
    let day_first = eu > us;
    map_present(dataset, column, |cell| {
        let text = cell.as_text();
        parse_date_with(&text, day_first)
            .map(|date| CellValue::Text(date.format("%Y-%m-%d").to_string()))
    });
}

/// Rewrites phone numbers as `+1 (XXX) XXX-XXXX` or `+CC (XXXXX XXXXX)`
/// depending on digit count and leading digits.
pub fn standardize_phones(dataset: &mut Dataset, column: &str) {
    map_present(dataset, column, |cell| {
        Some(CellValue::Text(format_phone(&cell.as_text())))
    });
}

/// Lower-cases and strips whitespace and stray dots from email addresses;
/// anything still invalid becomes [`INVALID_EMAIL`].
pub fn standardize_emails(dataset: &mut Dataset, column: &str) {
    map_present(dataset, column, |cell| {
        let cleaned = clean_email(&cell.as_text());
        Some(CellValue::Text(if is_valid_email(&cleaned) {
            cleaned
        } else {
            INVALID_EMAIL.to_string()
        }))
    });
}

/// Applies `f` to every non-empty cell; `None` keeps the cell.
pub(crate) fn map_present(
    dataset: &mut Dataset,
    column: &str,
    f: impl Fn(&CellValue) -> Option<CellValue>,
) {
    for row in &mut dataset.rows {
        let cell = row.get(column);
        if is_empty(cell) {
            continue;
        }
        if let Some(new) = f(cell) {
            row.set(column, new);
        }
    }
}

pub(crate) fn format_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let digits = digits.trim_start_matches('0');
    let first = digits.chars().next().unwrap_or('0');
    match digits.len() {
        10 if ('6'..='9').contains(&first) => indian(digits),
        10 if ('2'..='9').contains(&first) => north_american(digits),
        12 if digits.starts_with("91") => indian(&digits[2..]),
        11 if digits.starts_with('1') => north_american(&digits[1..]),
        11..=15 => {
            let (code, local) = digits.split_at(digits.len() - 10);
            format!("+{code} ({} {})", &local[..5], &local[5..])
        }
        _ => INVALID_PHONE.to_string(),
    }
}

fn indian(local: &str) -> String {
    format!("+91 ({} {})", &local[..5], &local[5..])
}

fn north_american(local: &str) -> String {
    format!("+1 ({}) {}-{}", &local[..3], &local[3..6], &local[6..])
}

pub(crate) fn clean_email(raw: &str) -> String {
    let mut value: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    while value.contains("..") {
        value = value.replace("..", ".");
    }
    value = value.replace("@.", "@").replace(".@", "@");
    value.trim_matches('.').to_string()
}
