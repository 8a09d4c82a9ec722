//! Operation dispatch.

use tidy_model::{CleaningOperation, Dataset, DetectOptions, Rename};
use tracing::{debug, warn};

use crate::categories::{
    fix_capitalization_inconsistency, fix_typos_and_mislabels, normalize_case,
    normalize_categories,
};
use crate::duplicates::handle_duplicates;
use crate::fill::fill_missing;
use crate::headers::{remove_empty_column, standardize_headers};
use crate::numeric::{convert_numeric_strings, fix_mixed_data_types};
use crate::outliers::handle_outliers;
use crate::standardize::{standardize_dates, standardize_emails, standardize_phones};
use crate::text::{fix_corrupted_encoding, remove_invisible_whitespace};

/// Result of applying one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Cleaned {
    pub dataset: Dataset,
    /// Header renames, only produced by `standardize_headers`.
    pub renames: Vec<Rename>,
    /// Whether the dataset differs from the input.
    pub changed: bool,
}

/// Applies `operation` to a copy of `dataset` with default detection
/// options.
pub fn apply(dataset: &Dataset, operation: &CleaningOperation) -> Cleaned {
    apply_with(dataset, operation, &DetectOptions::default())
}

/// Applies `operation` to a copy of `dataset`.
///
/// Unknown operations and operations naming a column the dataset lacks
/// return the input unchanged.
pub fn apply_with(
    dataset: &Dataset,
    operation: &CleaningOperation,
    options: &DetectOptions,
) -> Cleaned {
    let mut out = dataset.clone();
    let mut renames = Vec::new();

    if let Some(column) = operation.column()
        && !out.has_column(column)
    {
        warn!(operation = operation.name(), column, "column not found, skipping");
        return unchanged(dataset);
    }

    match operation {
        CleaningOperation::FillMissing { column, strategy } => {
            fill_missing(&mut out, column, *strategy);
        }
        CleaningOperation::HandleDuplicates { column, strategy } => {
            handle_duplicates(&mut out, column, *strategy);
        }
        CleaningOperation::HandleOutliers {
            column,
            strategy,
            bounds,
        } => handle_outliers(&mut out, column, *strategy, *bounds, options.iqr_multiplier),
        CleaningOperation::StandardizeDates { column } => standardize_dates(&mut out, column),
        CleaningOperation::StandardizePhones { column } => standardize_phones(&mut out, column),
        CleaningOperation::StandardizeEmails { column } => standardize_emails(&mut out, column),
        CleaningOperation::RemoveEmptyColumn { column } => {
            remove_empty_column(&mut out, column.as_deref());
        }
        CleaningOperation::StandardizeHeaders => renames = standardize_headers(&mut out),
        CleaningOperation::NormalizeCase { column, method } => {
            normalize_case(&mut out, column, *method);
        }
        CleaningOperation::NormalizeCategories { column } => normalize_categories(&mut out, column),
        CleaningOperation::FixCapitalizationInconsistency { column } => {
            fix_capitalization_inconsistency(&mut out, column);
        }
        CleaningOperation::FixTyposAndMislabels { column } => {
            fix_typos_and_mislabels(&mut out, column);
        }
        CleaningOperation::ConvertNumericStrings { column, choice } => {
            convert_numeric_strings(&mut out, column, *choice);
        }
        CleaningOperation::RemoveInvisibleWhitespace { column } => {
            remove_invisible_whitespace(&mut out, column);
        }
        CleaningOperation::FixCorruptedEncoding { column } => {
            fix_corrupted_encoding(&mut out, column);
        }
        CleaningOperation::FixMixedDataTypes { column } => fix_mixed_data_types(&mut out, column),
        CleaningOperation::Unsupported => {
            warn!("unsupported operation, skipping");
            return unchanged(dataset);
        }
    }

    let changed = out != *dataset;
    debug!(
        operation = operation.name(),
        column = operation.column().unwrap_or("*"),
        changed,
        rows = out.row_count(),
        "applied operation"
    );
    Cleaned {
        dataset: out,
        renames,
        changed,
    }
}

fn unchanged(dataset: &Dataset) -> Cleaned {
    Cleaned {
        dataset: dataset.clone(),
        renames: Vec::new(),
        changed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidy_model::{CellValue, FillStrategy, Row};

    fn dataset() -> Dataset {
        Dataset::from_rows(vec![
            Row::new().with("Name", "Ann").with("age", 30.0),
            Row::new().with("Name", "Bob").with("age", CellValue::Missing),
        ])
    }

    #[test]
    fn missing_column_is_a_no_op() {
        let data = dataset();
        let op = CleaningOperation::FillMissing {
            column: "nope".into(),
            strategy: FillStrategy::Mean,
        };
        let cleaned = apply(&data, &op);
        assert!(!cleaned.changed);
        assert_eq!(cleaned.dataset, data);
    }

    #[test]
    fn unknown_operation_is_a_no_op() {
        let data = dataset();
        let op: CleaningOperation = serde_json::from_str(r#"{"type":"teleport"}"#).unwrap();
        assert!(!apply(&data, &op).changed);
    }

    #[test]
    fn input_is_not_mutated() {
        let data = dataset();
        let op = CleaningOperation::FillMissing {
            column: "age".into(),
            strategy: FillStrategy::Mean,
        };
        let cleaned = apply(&data, &op);
        assert!(cleaned.changed);
        assert_eq!(cleaned.dataset.rows[1].get("age"), &CellValue::Number(30.0));
        assert!(data.rows[1].get("age").is_missing());
    }

    #[test]
    fn headers_report_renames() {
        let cleaned = apply(&dataset(), &CleaningOperation::StandardizeHeaders);
        assert_eq!(cleaned.renames, vec![Rename::new("Name", "name")]);
        assert_eq!(cleaned.dataset.columns, ["name", "age"]);
    }
}
