//! Missing value counts.

use tidy_model::{DetectOptions, Issue, IssueKind, Severity};

use crate::column::ColumnView;

/// Count empty cells; above the configured share of rows this is an error.
pub fn check(column: &ColumnView<'_>, options: &DetectOptions) -> Vec<Issue> {
    let missing = column.empty_count();
    if missing == 0 {
        return Vec::new();
    }
    let rows = column.row_count();
    let share = missing as f64 / rows as f64;
    let severity = if share > options.missing_error_ratio {
        Severity::Error
    } else {
        Severity::Warning
    };
    vec![Issue::new(
        IssueKind::MissingValues,
        column.name,
        missing as u64,
        severity,
        format!(
            "{missing} of {rows} values are missing ({:.1}%)",
            share * 100.0
        ),
    )]
}
