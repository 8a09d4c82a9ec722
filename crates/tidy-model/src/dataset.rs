//! In-memory tabular dataset.
//!
//! Rows are keyed by column name; the dataset keeps the column order
//! separately so renames and removals never reorder the table.

#![deny(unsafe_code)]

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::operation::Rename;

/// A single scalar cell.
///
/// Serialized untagged so a row round-trips as a plain JSON object
/// (`null`, numbers, booleans and strings).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Missing,
    Bool(bool),
    Number(f64),
    Text(String),
}

static MISSING: CellValue = CellValue::Missing;

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Textual rendering used for comparison and export.
    ///
    /// Whole numbers render without a fractional part; missing renders empty.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Missing => Cow::Borrowed(""),
            Self::Bool(value) => Cow::Borrowed(if *value { "true" } else { "false" }),
            Self::Number(value) => Cow::Owned(format_number(*value)),
            Self::Text(value) => Cow::Borrowed(value),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// One record, keyed by column name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    pub cells: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell for `column`, or [`CellValue::Missing`] when the row lacks it.
    pub fn get(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&MISSING)
    }

    pub fn set(&mut self, column: impl Into<String>, value: CellValue) {
        self.cells.insert(column.into(), value);
    }

    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.set(column, value.into());
        self
    }
}

/// Ordered rows sharing one column set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Dataset {
    /// Creates an empty dataset, rejecting duplicate column names.
    pub fn new(columns: Vec<String>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(ModelError::DuplicateColumn { name: name.clone() });
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Builds a dataset from positional records.
    pub fn from_records(columns: Vec<String>, records: Vec<Vec<CellValue>>) -> Result<Self> {
        let mut dataset = Self::new(columns)?;
        for (index, values) in records.into_iter().enumerate() {
            if values.len() != dataset.columns.len() {
                return Err(ModelError::RowLength {
                    row: index,
                    expected: dataset.columns.len(),
                    found: values.len(),
                });
            }
            let cells = dataset.columns.iter().cloned().zip(values).collect();
            dataset.rows.push(Row { cells });
        }
        Ok(dataset)
    }

    /// Builds a dataset whose column set is taken from the first row, in
    /// column-name order.
    ///
    /// Later rows are conformed: absent columns become missing, extra
    /// columns are dropped.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let columns = rows
            .first()
            .map(|row| row.cells.keys().cloned().collect())
            .unwrap_or_default();
        let mut dataset = Self {
            columns,
            rows: Vec::with_capacity(rows.len()),
        };
        for row in rows {
            dataset.push_row(row);
        }
        dataset
    }

    /// Appends a row conformed to the dataset's column set.
    pub fn push_row(&mut self, mut row: Row) {
        row.cells.retain(|name, _| self.columns.contains(name));
        for name in &self.columns {
            row.cells.entry(name.clone()).or_default();
        }
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn total_cells(&self) -> usize {
        self.row_count() * self.column_count()
    }

    /// True when there is nothing to inspect: no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    /// Cells of one column in row order.
    pub fn column_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a CellValue> + 'a {
        self.rows.iter().map(move |row| row.get(name))
    }

    /// Replaces every cell of `name` with `values`, in row order.
    ///
    /// Extra values are ignored; rows beyond `values` keep their cell.
    pub fn set_column(&mut self, name: &str, values: Vec<CellValue>) {
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.set(name, value);
        }
    }

    /// Removes a column from the header and from every row.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let before = self.columns.len();
        self.columns.retain(|column| column != name);
        if self.columns.len() == before {
            return false;
        }
        for row in &mut self.rows {
            row.cells.remove(name);
        }
        true
    }

    /// Applies header renames to the column list and to every row.
    pub fn rename_columns(&mut self, renames: &[Rename]) {
        if renames.is_empty() {
            return;
        }
        for column in &mut self.columns {
            if let Some(rename) = renames.iter().find(|rename| rename.old == *column) {
                column.clone_from(&rename.new);
            }
        }
        for row in &mut self.rows {
            let cells = std::mem::take(&mut row.cells);
            row.cells = cells
                .into_iter()
                .map(|(name, value)| {
                    match renames.iter().find(|rename| rename.old == name) {
                        Some(rename) => (rename.new.clone(), value),
                        None => (name, value),
                    }
                })
                .collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    #[test]
    fn rows_are_conformed_to_the_first_row_columns() {
        let dataset = Dataset::from_rows(vec![
            Row::new().with("a", "1").with("b", "2"),
            Row::new().with("a", "3").with("c", "x"),
        ]);
        assert_eq!(dataset.columns, cols(&["a", "b"]));
        assert_eq!(dataset.rows[1].get("b"), &CellValue::Missing);
        assert!(!dataset.rows[1].cells.contains_key("c"));
    }

    #[test]
    fn from_records_rejects_short_rows() {
        let err = Dataset::from_records(cols(&["a", "b"]), vec![vec![CellValue::from("x")]])
            .unwrap_err();
        assert!(matches!(err, ModelError::RowLength { row: 0, .. }));
    }

    #[test]
    fn duplicate_columns_are_rejected() {
        assert!(Dataset::new(cols(&["a", "a"])).is_err());
    }

    #[test]
    fn rename_keeps_column_order() {
        let mut dataset =
            Dataset::from_records(cols(&["First Name", "Age"]), vec![vec!["Ann".into(), 3.0.into()]])
                .unwrap();
        dataset.rename_columns(&[Rename::new("First Name", "first_name")]);
        assert_eq!(dataset.columns, cols(&["first_name", "Age"]));
        assert_eq!(dataset.rows[0].get("first_name"), &CellValue::from("Ann"));
    }

    #[test]
    fn drop_column_removes_cells_from_every_row() {
        let mut dataset = Dataset::from_records(
            cols(&["a", "b"]),
            vec![vec!["1".into(), "2".into()], vec!["3".into(), "4".into()]],
        )
        .unwrap();
        assert!(dataset.drop_column("b"));
        assert!(!dataset.drop_column("missing"));
        assert!(dataset.rows.iter().all(|row| row.cells.len() == 1));
    }

    #[test]
    fn numbers_render_without_trailing_zero() {
        assert_eq!(CellValue::Number(42.0).as_text(), "42");
        assert_eq!(CellValue::Number(2.5).as_text(), "2.5");
        assert_eq!(CellValue::Missing.as_text(), "");
    }

    #[test]
    fn rows_serialize_as_plain_objects() {
        let row = Row::new().with("n", 1.5).with("ok", true).with("s", "x");
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"n":1.5,"ok":true,"s":"x"}"#);
        let back: Row = serde_json::from_str(r#"{"n":null,"s":"y"}"#).unwrap();
        assert_eq!(back.get("n"), &CellValue::Missing);
    }
}
