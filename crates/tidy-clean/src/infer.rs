//! Column type inference from a sample of values.

use tidy_common::{cell_number, is_empty, parse_date};
use tidy_model::CellValue;

/// Non-empty values sampled when inferring a column type.
pub const INFER_SAMPLE: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Number,
    Date,
    String,
}

/// Number when every sampled value is numeric, date when every sampled
/// value parses as a date, string otherwise (including empty columns).
pub fn infer_type<'a>(cells: impl IntoIterator<Item = &'a CellValue>) -> ColumnType {
    let sample: Vec<&CellValue> = cells
        .into_iter()
        .filter(|cell| !is_empty(cell))
        .take(INFER_SAMPLE)
        .collect();
    if sample.is_empty() {
        return ColumnType::String;
    }
    if sample.iter().all(|cell| cell_number(cell).is_some()) {
        return ColumnType::Number;
    }
    let is_date =
        |cell: &&CellValue| matches!(cell, CellValue::Text(text) if parse_date(text).is_some());
    if sample.iter().all(is_date) {
        return ColumnType::Date;
    }
    ColumnType::String
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::from(*v)).collect()
    }

    #[test]
    fn infers_from_non_empty_values() {
        assert_eq!(infer_type(&cells(&["1", "", "2.5"])), ColumnType::Number);
        assert_eq!(infer_type(&cells(&["2024-01-01", "Jan 3, 2024"])), ColumnType::Date);
        assert_eq!(infer_type(&cells(&["1", "x"])), ColumnType::String);
        assert_eq!(infer_type(&cells(&["", "n/a"])), ColumnType::String);
    }

    #[test]
    fn only_the_first_values_are_sampled() {
        let mut values = vec!["1"; INFER_SAMPLE];
        values.push("text");
        assert_eq!(infer_type(&cells(&values)), ColumnType::Number);
    }
}
