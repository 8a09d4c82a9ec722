//! Date format drift.

use std::collections::BTreeMap;

use tidy_common::{DateShape, classify_date};
use tidy_model::{DetectOptions, Issue, IssueKind, Severity};

use super::describe_buckets;
use crate::column::ColumnView;

/// Flag date columns whose values use more than one format.
///
/// The count is the number of values outside the most common format.
pub fn check(column: &ColumnView<'_>, _options: &DetectOptions) -> Vec<Issue> {
    let mut buckets: BTreeMap<DateShape, usize> = BTreeMap::new();
    for cell in &column.present {
        *buckets.entry(classify_date(&cell.as_text())).or_default() += 1;
    }
    if buckets.len() <= 1 {
        return Vec::new();
    }
    let total: usize = buckets.values().sum();
    let dominant = buckets.values().copied().max().unwrap_or(0);
    vec![Issue::new(
        IssueKind::DateFormat,
        column.name,
        (total - dominant) as u64,
        Severity::Warning,
        format!(
            "Inconsistent date formats: {}",
            describe_buckets(&buckets, DateShape::label)
        ),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::test_support::dataset;

    #[test]
    fn single_format_is_clean() {
        let data = dataset("signup_date", &["2024-01-01", "2024-02-03", ""]);
        assert!(check(&ColumnView::new(&data, "signup_date"), &DetectOptions::default()).is_empty());
    }

    #[test]
    fn mixed_formats_count_minority_values() {
        let data = dataset(
            "signup_date",
            &["2024-01-01", "2024-02-03", "03/15/2024", "Jan 5, 2024"],
        );
        let issues = check(&ColumnView::new(&data, "signup_date"), &DetectOptions::default());
        assert_eq!(issues[0].count, 2);
        insta::assert_snapshot!(
            issues[0].description,
            @"Inconsistent date formats: ISO (2), US (1), text (1)"
        );
    }
}
