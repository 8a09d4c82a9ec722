//! IQR outliers.

use tidy_common::{IqrFences, cell_number};
use tidy_model::{DetectOptions, Issue, IssueKind, Severity};

use crate::column::ColumnView;

pub fn check(column: &ColumnView<'_>, options: &DetectOptions) -> Vec<Issue> {
    let values: Vec<f64> = column.present.iter().filter_map(|cell| cell_number(cell)).collect();
    if values.len() < options.outlier_min_values {
        return Vec::new();
    }
    let Some(fences) = IqrFences::compute(&values, options.iqr_multiplier) else {
        return Vec::new();
    };
    let outside = values.iter().filter(|v| !fences.contains(**v)).count();
    if outside == 0 {
        return Vec::new();
    }
    vec![Issue::new(
        IssueKind::Outliers,
        column.name,
        outside as u64,
        Severity::Warning,
        format!(
            "{outside} value(s) outside the expected range [{}, {}]",
            fences.low, fences.high
        ),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::test_support::numbers;

    #[test]
    fn single_high_value_is_an_outlier() {
        let data = numbers("amount", &[1.0, 2.0, 3.0, 4.0, 100.0]);
        let issues = check(&ColumnView::new(&data, "amount"), &DetectOptions::default());
        assert_eq!(issues[0].count, 1);
        assert_eq!(
            issues[0].description,
            "1 value(s) outside the expected range [-1, 7]"
        );
    }

    #[test]
    fn needs_enough_numeric_values() {
        let data = numbers("amount", &[1.0, 2.0, 3.0, 100.0]);
        assert!(check(&ColumnView::new(&data, "amount"), &DetectOptions::default()).is_empty());
    }
}
