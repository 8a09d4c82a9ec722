//! Email address validity.

use tidy_common::is_valid_email;
use tidy_model::{DetectOptions, Issue, IssueKind, Severity};

use crate::column::{ColumnView, samples};

pub fn check(column: &ColumnView<'_>, options: &DetectOptions) -> Vec<Issue> {
    let invalid: Vec<String> = column
        .present
        .iter()
        .map(|cell| cell.as_text().trim().to_string())
        .filter(|value| !is_valid_email(value))
        .collect();
    if invalid.is_empty() {
        return Vec::new();
    }
    vec![Issue::new(
        IssueKind::EmailFormat,
        column.name,
        invalid.len() as u64,
        Severity::Error,
        format!(
            "{} invalid email address(es): {}",
            invalid.len(),
            samples(invalid.iter().map(String::as_str), options.sample_size)
        ),
    )]
}
