//! Double-encoded UTF-8.

use tidy_common::has_mojibake;
use tidy_model::{DetectOptions, Issue, IssueKind, Severity};

use crate::column::{ColumnView, samples};

pub fn check(column: &ColumnView<'_>, options: &DetectOptions) -> Vec<Issue> {
    let corrupted: Vec<&str> = column
        .present_text()
        .filter(|text| has_mojibake(text))
        .collect();
    if corrupted.is_empty() {
        return Vec::new();
    }
    vec![Issue::new(
        IssueKind::CorruptedEncoding,
        column.name,
        corrupted.len() as u64,
        Severity::Warning,
        format!(
            "{} value(s) look double-encoded: {}",
            corrupted.len(),
            samples(corrupted.iter().copied(), options.sample_size)
        ),
    )]
}
