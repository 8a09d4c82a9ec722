//! JSON dataset files.
//!
//! A dataset is stored as `{"columns": [...], "rows": [{...}, ...]}`. A
//! bare array of row objects is accepted on load as well; its columns come
//! from the first row, in the order its keys appear in the file.

use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use tidy_model::{Dataset, Row};

use crate::error::{IngestError, Result};

#[derive(Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    Table(Dataset),
    Records(Vec<Map<String, Value>>),
}

/// Parses a dataset from JSON text.
pub fn parse_json(text: &str) -> serde_json::Result<Dataset> {
    let dataset = match serde_json::from_str(text)? {
        DatasetFile::Table(table) => {
            let mut dataset = Dataset {
                columns: table.columns,
                rows: Vec::with_capacity(table.rows.len()),
            };
            for row in table.rows {
                dataset.push_row(row);
            }
            dataset
        }
        DatasetFile::Records(records) => records_to_dataset(records)?,
    };
    Ok(dataset)
}

fn records_to_dataset(records: Vec<Map<String, Value>>) -> serde_json::Result<Dataset> {
    let columns = records
        .first()
        .map(|record| record.keys().cloned().collect())
        .unwrap_or_default();
    let mut dataset = Dataset {
        columns,
        rows: Vec::with_capacity(records.len()),
    };
    for record in records {
        let mut row = Row::new();
        for (column, value) in record {
            row.set(column, serde_json::from_value(value)?);
        }
        dataset.push_row(row);
    }
    Ok(dataset)
}

pub fn read_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::read(path, e))?;
    let dataset = parse_json(&text).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), rows = dataset.row_count(), "read json");
    Ok(dataset)
}

/// Writes `dataset` as pretty-printed JSON.
pub fn write_json(dataset: &Dataset, path: &Path) -> Result<()> {
    let text = serde_json::to_string_pretty(dataset)?;
    std::fs::write(path, text).map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), rows = dataset.row_count(), "wrote json");
    Ok(())
}

#[cfg(test)]
mod tests {
    use tidy_model::CellValue;

    use super::*;

    #[test]
    fn table_form_keeps_column_order() {
        let dataset = parse_json(
            r#"{"columns": ["name", "age"], "rows": [{"name": "Ann", "age": 31}, {"name": "Bob"}]}"#,
        )
        .unwrap();
        assert_eq!(dataset.columns, vec!["name", "age"]);
        assert_eq!(dataset.rows[0].get("age"), &CellValue::Number(31.0));
        assert!(dataset.rows[1].get("age").is_missing());
    }

    #[test]
    fn record_arrays_are_accepted() {
        let dataset = parse_json(r#"[{"email": "a@x.com", "vip": true}, {"email": null}]"#).unwrap();
        assert_eq!(dataset.columns, vec!["email", "vip"]);
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.rows[0].get("vip"), &CellValue::Bool(true));
    }

    #[test]
    fn record_columns_follow_the_first_record() {
        let dataset =
            parse_json(r#"[{"zip": "1", "Name": "Ann", "age": 3}, {"age": 4, "zip": "2"}]"#)
                .unwrap();
        assert_eq!(dataset.columns, vec!["zip", "Name", "age"]);
        assert_eq!(dataset.rows[1].get("zip"), &CellValue::text("2"));
        assert!(dataset.rows[1].get("Name").is_missing());
    }

    #[test]
    fn other_shapes_are_rejected() {
        assert!(parse_json(r#""just text""#).is_err());
    }
}
