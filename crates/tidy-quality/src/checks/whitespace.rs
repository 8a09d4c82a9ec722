//! Stray and invisible whitespace.

use tidy_common::is_invisible;
use tidy_model::{DetectOptions, Issue, IssueKind, Severity};

use crate::column::ColumnView;

pub fn check(column: &ColumnView<'_>, _options: &DetectOptions) -> Vec<Issue> {
    let affected = column
        .present
        .iter()
        .filter_map(|cell| cell.as_str())
        .filter(|text| text.trim() != *text || text.chars().any(is_invisible))
        .count();
    if affected == 0 {
        return Vec::new();
    }
    vec![Issue::new(
        IssueKind::InvisibleWhitespace,
        column.name,
        affected as u64,
        Severity::Warning,
        format!("{affected} value(s) carry leading, trailing or zero-width whitespace"),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::test_support::dataset;

    #[test]
    fn counts_padded_and_zero_width_values() {
        let data = dataset("name", &[" Ann", "Bob\u{200B}", "Cy", "  "]);
        let issues = check(&ColumnView::new(&data, "name"), &DetectOptions::default());
        assert_eq!(issues[0].count, 2);
    }
}
