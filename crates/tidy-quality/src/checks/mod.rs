//! Column check modules.
//!
//! Each module inspects one column and returns the issues it finds.
//! Generic checks run on every column; format checks are selected by an
//! ordered keyword table over the column name.

mod case;
mod categorical;
pub mod dates;
mod duplicates;
mod emails;
mod encoding;
mod header;
mod missing;
mod numeric;
mod outliers;
pub mod phones;
pub mod types;
mod whitespace;

use std::collections::BTreeMap;

use tidy_model::{DetectOptions, Issue, IssueKind, Severity};

use crate::column::ColumnView;

pub use categorical::is_typo_pair;

/// Signature shared by every column check.
pub type Check = fn(&ColumnView<'_>, &DetectOptions) -> Vec<Issue>;

/// Keyword rule selecting a format check by column name.
pub struct FormatRule {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub check: Check,
}

/// First matching rule wins.
pub const FORMAT_RULES: &[FormatRule] = &[
    FormatRule {
        name: "email",
        keywords: &["email", "e-mail", "e_mail"],
        check: emails::check,
    },
    FormatRule {
        name: "phone",
        keywords: &["phone", "mobile"],
        check: phones::check,
    },
    FormatRule {
        name: "date",
        keywords: &["date", "time"],
        check: dates::check,
    },
];

/// Checks run on every non-empty column, in reporting order.
const COLUMN_CHECKS: &[Check] = &[
    missing::check,
    header::check,
    duplicates::check,
    outliers::check,
    whitespace::check,
    encoding::check,
    types::check,
    categorical::check,
    case::check,
    numeric::check,
];

/// Format rule for a column name, if any keyword matches.
pub fn format_rule(column: &str) -> Option<&'static FormatRule> {
    let lowered = column.to_lowercase();
    FORMAT_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|keyword| lowered.contains(keyword)))
}

/// Run every applicable check on one column.
///
/// A column with no non-empty cell yields a single `empty_column` issue.
pub fn run_column(column: &ColumnView<'_>, options: &DetectOptions) -> Vec<Issue> {
    if column.present.is_empty() {
        return vec![Issue::new(
            IssueKind::EmptyColumn,
            column.name,
            column.row_count() as u64,
            Severity::Error,
            format!("Column '{}' has no values", column.name),
        )];
    }
    let format_check = format_rule(column.name).map(|rule| rule.check);
    COLUMN_CHECKS
        .iter()
        .copied()
        .chain(format_check)
        .flat_map(|check| check(column, options))
        .collect()
}

/// `"ISO (3), US (1)"`, in bucket order.
fn describe_buckets<K>(buckets: &BTreeMap<K, usize>, label: fn(&K) -> &'static str) -> String {
    buckets
        .iter()
        .map(|(key, count)| format!("{} ({count})", label(key)))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
pub(crate) mod test_support {
    use tidy_model::{CellValue, Dataset, Row};

    pub fn dataset(name: &str, values: &[&str]) -> Dataset {
        Dataset::from_rows(
            values
                .iter()
                .map(|value| Row::new().with(name, *value))
                .collect(),
        )
    }

    pub fn numbers(name: &str, values: &[f64]) -> Dataset {
        Dataset::from_rows(
            values
                .iter()
                .map(|value| Row::new().with(name, CellValue::Number(*value)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::dataset;
    use super::*;

    #[test]
    fn rules_match_by_keyword_in_order() {
        assert_eq!(format_rule("Signup Date").map(|r| r.name), Some("date"));
        assert_eq!(format_rule("mobile_phone").map(|r| r.name), Some("phone"));
        assert_eq!(format_rule("email_updated_time").map(|r| r.name), Some("email"));
        assert!(format_rule("name").is_none());
    }

    #[test]
    fn empty_column_short_circuits() {
        let data = dataset("Notes Field", &["", "n/a", "-"]);
        let issues = run_column(&ColumnView::new(&data, "Notes Field"), &DetectOptions::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::EmptyColumn);
        assert_eq!(issues[0].count, 3);
    }
}
