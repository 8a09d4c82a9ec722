//! Numbers stored as text.

use tidy_common::numeric_string_value;
use tidy_model::{DetectOptions, Issue, IssueKind, Severity};

use crate::column::ColumnView;

pub fn check(column: &ColumnView<'_>, _options: &DetectOptions) -> Vec<Issue> {
    let convertible = column
        .present_text()
        .filter(|text| numeric_string_value(text).is_some())
        .count();
    if convertible == 0 {
        return Vec::new();
    }
    vec![Issue::new(
        IssueKind::ConvertNumericString,
        column.name,
        convertible as u64,
        Severity::Info,
        format!("{convertible} numeric value(s) stored as text"),
    )]
}
