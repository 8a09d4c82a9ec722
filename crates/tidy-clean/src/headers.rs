//! Dataset-wide header operations.

use std::collections::HashSet;

use tidy_common::is_empty;
use tidy_model::{Dataset, Rename};
use tracing::debug;

/// Lower-cases column names, turns whitespace runs into `_` and strips
/// anything outside `[a-z0-9_]`, keeping column order.
///
/// Names that collapse to nothing become `column_<position>`; collisions
/// get `_2`, `_3`, ... suffixes. Returns the renames that changed a name.
pub fn standardize_headers(dataset: &mut Dataset) -> Vec<Rename> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut renames = Vec::new();
    for (position, old) in dataset.columns.iter().enumerate() {
        let mut base = header_key(old);
        if base.is_empty() {
            base = format!("column_{}", position + 1);
        }
        let mut candidate = base.clone();
        let mut suffix = 2;
        while taken.contains(&candidate) {
            candidate = format!("{base}_{suffix}");
            suffix += 1;
        }
        taken.insert(candidate.clone());
        if candidate != *old {
            renames.push(Rename::new(old.clone(), candidate));
        }
    }
    debug!(renamed = renames.len(), "standardized headers");
    dataset.rename_columns(&renames);
    renames
}

fn header_key(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    lowered
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}

fn is_empty_column(dataset: &Dataset, column: &str) -> bool {
    dataset.column_values(column).all(is_empty)
}

/// Drops `column` when every cell is empty, or every fully-empty column
/// when `column` is `None`. Returns whether anything was removed.
pub fn remove_empty_column(dataset: &mut Dataset, column: Option<&str>) -> bool {
    let targets: Vec<String> = match column {
        Some(name) if dataset.has_column(name) && is_empty_column(dataset, name) => {
            vec![name.to_string()]
        }
        Some(_) => Vec::new(),
        None => dataset
            .columns
            .iter()
            .filter(|name| is_empty_column(dataset, name))
            .cloned()
            .collect(),
    };
    for name in &targets {
        dataset.drop_column(name);
    }
    !targets.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidy_model::CellValue;

    fn dataset(columns: &[&str]) -> Dataset {
        let columns: Vec<String> = columns.iter().map(ToString::to_string).collect();
        let record = vec![CellValue::text("v"); columns.len()];
        Dataset::from_records(columns, vec![record]).unwrap()
    }

    #[test]
    fn headers_are_snake_cased_in_order() {
        let mut data = dataset(&[" First Name ", "E-mail", "zip", "Zip", "???"]);
        let renames = standardize_headers(&mut data);
        assert_eq!(data.columns, ["first_name", "email", "zip", "zip_2", "column_5"]);
        assert_eq!(renames.len(), 4);
        assert_eq!(renames[0], Rename::new(" First Name ", "first_name"));
        assert_eq!(data.rows[0].get("zip_2"), &CellValue::text("v"));
    }

    #[test]
    fn clean_headers_produce_no_renames() {
        let mut data = dataset(&["id", "name_2"]);
        assert!(standardize_headers(&mut data).is_empty());
    }

    #[test]
    fn remove_empty_column_scoped_and_global() {
        let columns = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let records = vec![
            vec![CellValue::text("x"), CellValue::Missing, CellValue::text("n/a")],
            vec![CellValue::text(""), CellValue::text(" "), CellValue::Missing],
        ];
        let mut data = Dataset::from_records(columns, records).unwrap();
        assert!(!remove_empty_column(&mut data, Some("a")));
        assert!(!remove_empty_column(&mut data, Some("missing")));
        assert!(remove_empty_column(&mut data, Some("b")));
        assert_eq!(data.columns, ["a", "c"]);
        assert!(remove_empty_column(&mut data, None));
        assert_eq!(data.columns, ["a"]);
        assert!(data.rows.iter().all(|row| row.cells.len() == 1));
    }
}
