//! Quality score.

use tidy_model::{Dataset, Issue};

/// Single 0-100 quality score for a dataset and its issues.
///
/// Each issue affects `count` cells, doubled for errors; the score is the
/// unaffected share of `2 * rows * columns`. Empty datasets score 0.
pub fn quality_score(dataset: &Dataset, issues: &[Issue]) -> u8 {
    let total_cells = dataset.total_cells();
    if total_cells == 0 {
        return 0;
    }
    let affected: u64 = issues.iter().map(Issue::weighted_count).sum();
    let ratio = affected as f64 / (total_cells as f64 * 2.0);
    ((1.0 - ratio) * 100.0).clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tidy_model::{IssueKind, Row, Severity};

    fn grid(rows: usize) -> Dataset {
        Dataset::from_rows(
            (0..rows)
                .map(|i| Row::new().with("a", i as f64).with("b", "x"))
                .collect(),
        )
    }

    fn issue(count: u64, severity: Severity) -> Issue {
        Issue::new(IssueKind::MissingValues, "a", count, severity, "")
    }

    #[test]
    fn clean_dataset_scores_full_marks() {
        assert_eq!(quality_score(&grid(5), &[]), 100);
        assert_eq!(quality_score(&Dataset::default(), &[]), 0);
    }

    #[test]
    fn errors_weigh_double() {
        let data = grid(10);
        assert_eq!(quality_score(&data, &[issue(4, Severity::Warning)]), 90);
        assert_eq!(quality_score(&data, &[issue(4, Severity::Error)]), 80);
        assert_eq!(quality_score(&data, &[issue(1000, Severity::Error)]), 0);
    }

    proptest! {
        #[test]
        fn removing_an_issue_never_lowers_the_score(
            rows in 1usize..40,
            counts in prop::collection::vec((0u64..50, any::<bool>()), 1..8),
        ) {
            let data = grid(rows);
            let issues: Vec<Issue> = counts
                .iter()
                .map(|(count, error)| issue(*count, if *error { Severity::Error } else { Severity::Info }))
                .collect();
            let full = quality_score(&data, &issues);
            prop_assert!(full <= 100);
            let fewer = quality_score(&data, &issues[1..]);
            prop_assert!(fewer >= full);
        }
    }
}
