//! Type coercion for numeric-looking and mixed-type columns.

use tidy_common::{numeric_string_value, parse_f64};
use tidy_model::{CellValue, Dataset, NumericChoice};

use crate::standardize::map_present;

const NUMBER_WORDS: &[(&str, f64)] = &[
    ("zero", 0.0),
    ("one", 1.0),
    ("two", 2.0),
    ("three", 3.0),
    ("four", 4.0),
    ("five", 5.0),
    ("six", 6.0),
    ("seven", 7.0),
    ("eight", 8.0),
    ("nine", 9.0),
    ("ten", 10.0),
    ("twenty", 20.0),
    ("thirty", 30.0),
    ("forty", 40.0),
    ("fifty", 50.0),
];

const TRUE_WORDS: &[&str] = &["true", "yes", "y"];
const FALSE_WORDS: &[&str] = &["false", "no", "n"];
const NULL_WORDS: &[&str] = &["", "null", "none", "na", "n/a", "nan", "undefined"];

/// Converts numeric-looking text to numbers, or numbers to text.
///
/// Cells that do not fit the source shape are left untouched.
pub fn convert_numeric_strings(dataset: &mut Dataset, column: &str, choice: NumericChoice) {
    map_present(dataset, column, |cell| match (choice, cell) {
        (NumericChoice::ToNumeric, CellValue::Text(text)) => {
            numeric_string_value(text).map(CellValue::Number)
        }
        (NumericChoice::ToString, CellValue::Number(_)) => {
            Some(CellValue::Text(cell.as_text().into_owned()))
        }
        _ => None,
    });
}

/// Coerces text cells to booleans, numbers or missing where they clearly
/// spell one; other text is kept.
pub fn fix_mixed_data_types(dataset: &mut Dataset, column: &str) {
    for row in &mut dataset.rows {
        let CellValue::Text(text) = row.get(column) else {
            continue;
        };
        if let Some(value) = coerce(text) {
            row.set(column, value);
        }
    }
}

fn coerce(text: &str) -> Option<CellValue> {
    let key: String = text
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '/'))
        .collect();
    if TRUE_WORDS.contains(&key.as_str()) {
        return Some(CellValue::Bool(true));
    }
    if FALSE_WORDS.contains(&key.as_str()) {
        return Some(CellValue::Bool(false));
    }
    if NULL_WORDS.contains(&key.as_str()) {
        return Some(CellValue::Missing);
    }
    if let Some(number) = parse_f64(&key) {
        return Some(CellValue::Number(number));
    }
    NUMBER_WORDS
        .iter()
        .find(|(word, _)| *word == key)
        .map(|(_, number)| CellValue::Number(*number))
}
