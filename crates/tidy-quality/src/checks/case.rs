//! Case drift in free-text columns.

use std::collections::HashSet;

use tidy_model::{DetectOptions, Issue, IssueKind, Severity};

use super::format_rule;
use crate::column::ColumnView;

/// Average length above which a text column counts as free text.
const FREE_TEXT_MIN_AVG_LEN: f64 = 10.0;

/// Flag long free-text values that repeat with different capitalisation.
pub fn check(column: &ColumnView<'_>, options: &DetectOptions) -> Vec<Issue> {
    if !column.is_textual()
        || format_rule(column.name).is_some()
        || column.is_categorical(options.categorical_min, options.categorical_max)
    {
        return Vec::new();
    }
    let texts: Vec<&str> = column.present_text().collect();
    let avg_len =
        texts.iter().map(|text| text.chars().count()).sum::<usize>() as f64 / texts.len() as f64;
    if avg_len <= FREE_TEXT_MIN_AVG_LEN {
        return Vec::new();
    }
    let exact: HashSet<&str> = texts.iter().copied().collect();
    let folded: HashSet<String> = texts.iter().map(|text| text.to_lowercase()).collect();
    let variants = exact.len() - folded.len();
    if variants == 0 {
        return Vec::new();
    }
    vec![Issue::new(
        IssueKind::NormalizeCase,
        column.name,
        variants as u64,
        Severity::Info,
        format!("{variants} free-text value(s) repeat with different capitalisation"),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::test_support::dataset;

    #[test]
    fn long_text_case_variants() {
        let mut values: Vec<String> = (0..60).map(|i| format!("comment number {i}")).collect();
        values.push("COMMENT NUMBER 1".to_string());
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        let data = dataset("notes", &refs);
        let issues = check(&ColumnView::new(&data, "notes"), &DetectOptions::default());
        assert_eq!(issues[0].count, 1);
    }

    #[test]
    fn short_labels_are_left_to_categorical_checks() {
        let data = dataset("notes", &["ok", "OK"]);
        assert!(check(&ColumnView::new(&data, "notes"), &DetectOptions::default()).is_empty());
    }
}
