//! Mixed value types within a column.

use std::collections::BTreeMap;

use tidy_common::{DateShape, classify_date, parse_date, parse_f64};
use tidy_model::{CellValue, DetectOptions, Issue, IssueKind, Severity};

use super::describe_buckets;
use crate::column::ColumnView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValueType {
    Number,
    Boolean,
    Date,
    String,
}

impl ValueType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::String => "string",
        }
    }
}

pub fn classify_value(value: &CellValue) -> ValueType {
    match value {
        CellValue::Number(_) => ValueType::Number,
        CellValue::Bool(_) => ValueType::Boolean,
        CellValue::Missing => ValueType::String,
        CellValue::Text(text) => {
            let trimmed = text.trim();
            if parse_f64(trimmed).is_some() {
                ValueType::Number
            } else if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("false")
            {
                ValueType::Boolean
            } else if classify_date(trimmed) != DateShape::Unknown && parse_date(trimmed).is_some()
            {
                ValueType::Date
            } else {
                ValueType::String
            }
        }
    }
}

/// Flag columns whose non-empty values fall into more than one type.
///
/// The count is the number of values outside the most common type.
pub fn check(column: &ColumnView<'_>, _options: &DetectOptions) -> Vec<Issue> {
    let mut buckets: BTreeMap<ValueType, usize> = BTreeMap::new();
    for cell in &column.present {
        *buckets.entry(classify_value(cell)).or_default() += 1;
    }
    if buckets.len() <= 1 {
        return Vec::new();
    }
    let total: usize = buckets.values().sum();
    let dominant = buckets.values().copied().max().unwrap_or(0);
    vec![Issue::new(
        IssueKind::MixedDataTypes,
        column.name,
        (total - dominant) as u64,
        Severity::Error,
        format!(
            "Mixed data types: {}",
            describe_buckets(&buckets, ValueType::label)
        ),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::test_support::dataset;

    #[test]
    fn classifies_text_by_content() {
        assert_eq!(classify_value(&CellValue::text("12")), ValueType::Number);
        assert_eq!(classify_value(&CellValue::text("TRUE")), ValueType::Boolean);
        assert_eq!(classify_value(&CellValue::text("2024-01-01")), ValueType::Date);
        assert_eq!(classify_value(&CellValue::text("twelve")), ValueType::String);
        assert_eq!(classify_value(&CellValue::Bool(false)), ValueType::Boolean);
    }

    #[test]
    fn mixed_column_is_an_error() {
        let data = dataset("age", &["12", "13", "fourteen", "yes", ""]);
        let issues = check(&ColumnView::new(&data, "age"), &DetectOptions::default());
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].count, 2);
        assert_eq!(issues[0].description, "Mixed data types: number (2), string (2)");
    }
}
