//! Repeated values within a column.

use std::collections::HashMap;

use tidy_common::fold_key;
use tidy_model::{DetectOptions, Issue, IssueKind, Severity};

use crate::column::{ColumnView, samples};

/// Count distinct values that occur more than once, compared trimmed and
/// case-insensitively. Empty cells never count as duplicates.
pub fn check(column: &ColumnView<'_>, options: &DetectOptions) -> Vec<Issue> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for cell in &column.present {
        let key = fold_key(cell);
        if key.is_empty() {
            continue;
        }
        let count = counts.entry(key.clone()).or_default();
        *count += 1;
        if *count == 2 {
            order.push(key);
        }
    }
    if order.is_empty() {
        return Vec::new();
    }
    vec![Issue::new(
        IssueKind::Duplicates,
        column.name,
        order.len() as u64,
        Severity::Warning,
        format!(
            "{} value(s) appear more than once: {}",
            order.len(),
            samples(order.iter().map(String::as_str), options.sample_size)
        ),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::test_support::dataset;

    #[test]
    fn case_variants_count_once() {
        let data = dataset("email", &["A@x.com", "a@x.com", ""]);
        let issues = check(&ColumnView::new(&data, "email"), &DetectOptions::default());
        assert_eq!(issues[0].count, 1);
        assert_eq!(issues[0].description, "1 value(s) appear more than once: a@x.com");
    }

    #[test]
    fn empties_are_not_duplicates() {
        let data = dataset("email", &["", "", "n/a", "x@y.com"]);
        assert!(check(&ColumnView::new(&data, "email"), &DetectOptions::default()).is_empty());
    }
}
