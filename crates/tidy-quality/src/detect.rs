//! Dataset-level issue detection.

use tidy_model::{DetectOptions, Dataset, Issue};
use tracing::{debug, info_span};

use crate::checks::run_column;
use crate::column::ColumnView;

/// Detect issues with default options.
pub fn detect(dataset: &Dataset) -> Vec<Issue> {
    detect_with(dataset, &DetectOptions::default())
}

/// Detect issues column by column.
///
/// Pure: the dataset is never modified, and repeated calls return the same
/// list. An empty dataset yields no issues.
pub fn detect_with(dataset: &Dataset, options: &DetectOptions) -> Vec<Issue> {
    let span = info_span!(
        "detect",
        rows = dataset.row_count(),
        columns = dataset.column_count()
    );
    let _guard = span.enter();
    if dataset.is_empty() {
        return Vec::new();
    }
    dataset
        .columns
        .iter()
        .flat_map(|name| detect_column(dataset, name, options))
        .collect()
}

/// Issues for a single column.
pub fn detect_column(dataset: &Dataset, column: &str, options: &DetectOptions) -> Vec<Issue> {
    let view = ColumnView::new(dataset, column);
    let issues = run_column(&view, options);
    debug!(column, issues = issues.len(), "column checked");
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidy_model::{IssueKind, Row};

    #[test]
    fn empty_dataset_has_no_issues() {
        assert!(detect(&Dataset::default()).is_empty());
        let no_rows = Dataset::new(vec!["a".to_string()]).unwrap();
        assert!(detect(&no_rows).is_empty());
    }

    #[test]
    fn detection_is_repeatable() {
        let data = Dataset::from_rows(vec![
            Row::new().with("Name", "Ann ").with("age", "12"),
            Row::new().with("Name", "ann").with("age", ""),
        ]);
        let first = detect(&data);
        assert_eq!(first, detect(&data));
        assert!(first.iter().any(|i| i.kind == IssueKind::HeaderInconsistency));
    }
}
