//! Read-only view of one column under evaluation.

use std::collections::HashSet;

use tidy_common::{column_tokens, is_empty};
use tidy_model::{CellValue, Dataset};

/// Cells of one column, with the non-empty ones pre-selected.
#[derive(Debug, Clone)]
pub struct ColumnView<'a> {
    pub name: &'a str,
    pub cells: Vec<&'a CellValue>,
    pub present: Vec<&'a CellValue>,
}

impl<'a> ColumnView<'a> {
    pub fn new(dataset: &'a Dataset, name: &'a str) -> Self {
        let cells: Vec<&CellValue> = dataset.column_values(name).collect();
        let present = cells.iter().copied().filter(|cell| !is_empty(cell)).collect();
        Self {
            name,
            cells,
            present,
        }
    }

    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.len() - self.present.len()
    }

    /// Non-empty text cells, trimmed.
    pub fn present_text(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.present
            .iter()
            .copied()
            .filter_map(CellValue::as_str)
            .map(str::trim)
    }

    /// Identifier-like columns are never treated as labels.
    pub fn is_identifier(&self) -> bool {
        column_tokens(self.name)
            .iter()
            .any(|token| matches!(token.as_str(), "id" | "code" | "uuid" | "guid"))
    }

    /// Holds text and is not an identifier.
    pub fn is_textual(&self) -> bool {
        !self.is_identifier() && self.present_text().next().is_some()
    }

    /// Distinct lower-cased text labels, in first-seen order.
    pub fn distinct_lower(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.present_text()
            .map(str::to_lowercase)
            .filter(|label| seen.insert(label.clone()))
            .collect()
    }

    /// Textual with a bounded number of distinct labels.
    pub fn is_categorical(&self, min: usize, max: usize) -> bool {
        if !self.is_textual() {
            return false;
        }
        let distinct = self.distinct_lower().len();
        distinct >= min && distinct <= max
    }
}

/// Collects up to `limit` examples.
pub(crate) fn samples<'s>(values: impl Iterator<Item = &'s str>, limit: usize) -> String {
    values.take(limit).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidy_model::Row;

    fn dataset(name: &str, values: &[&str]) -> Dataset {
        Dataset::from_rows(values.iter().map(|v| Row::new().with(name, *v)).collect())
    }

    #[test]
    fn present_excludes_placeholders() {
        let data = dataset("city", &["Paris", "", "n/a", " Rome "]);
        let view = ColumnView::new(&data, "city");
        assert_eq!(view.row_count(), 4);
        assert_eq!(view.empty_count(), 2);
        assert_eq!(view.present_text().collect::<Vec<_>>(), vec!["Paris", "Rome"]);
    }

    #[test]
    fn identifier_columns_are_not_textual() {
        let data = dataset("customer_id", &["a1", "b2"]);
        assert!(!ColumnView::new(&data, "customer_id").is_textual());
        let data = dataset("valid", &["yes", "no"]);
        assert!(ColumnView::new(&data, "valid").is_categorical(2, 50));
    }
}
