//! CSV reading through polars and CSV writing through the `csv` crate.

use std::io::{Cursor, Write};
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tidy_model::{CellValue, Dataset};

use crate::error::{IngestError, Result};

/// Rows polars samples when type inference is enabled.
const INFER_SCHEMA_ROWS: usize = 100;

/// How a CSV file is turned into a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    /// Let polars infer numeric and boolean columns. When off every value
    /// is read as text and typing is left to the cleaning operations.
    pub infer_types: bool,
}

impl IngestOptions {
    #[must_use]
    pub fn with_infer_types(mut self, infer_types: bool) -> Self {
        self.infer_types = infer_types;
        self
    }
}

/// Reads the file as UTF-8, decoding it as Windows-1252 when it is not
/// valid UTF-8. UTF-16 files are rejected.
fn read_text(path: &Path) -> Result<Vec<u8>> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::read(path, e))?;
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "UTF-16 LE",
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "UTF-16 BE",
        });
    }
    let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&bytes);
    if std::str::from_utf8(body).is_ok() {
        return Ok(body.to_vec());
    }
    let (decoded, _, had_errors) = WINDOWS_1252.decode(body);
    if had_errors {
        warn!(path = %path.display(), "undecodable bytes replaced while reading");
    }
    debug!(path = %path.display(), "decoded as windows-1252");
    Ok(decoded.into_owned().into_bytes())
}

/// Converts one polars value into a cell.
pub fn any_to_cell(value: AnyValue<'_>) -> CellValue {
    match value {
        AnyValue::Null => CellValue::Missing,
        AnyValue::Boolean(b) => CellValue::Bool(b),
        AnyValue::Int8(v) => CellValue::Number(f64::from(v)),
        AnyValue::Int16(v) => CellValue::Number(f64::from(v)),
        AnyValue::Int32(v) => CellValue::Number(f64::from(v)),
        AnyValue::Int64(v) => CellValue::Number(v as f64),
        AnyValue::UInt8(v) => CellValue::Number(f64::from(v)),
        AnyValue::UInt16(v) => CellValue::Number(f64::from(v)),
        AnyValue::UInt32(v) => CellValue::Number(f64::from(v)),
        AnyValue::UInt64(v) => CellValue::Number(v as f64),
        AnyValue::Float32(v) => CellValue::Number(f64::from(v)),
        AnyValue::Float64(v) => CellValue::Number(v),
        AnyValue::String(s) => CellValue::text(s),
        AnyValue::StringOwned(s) => CellValue::text(s.as_str()),
        other => CellValue::Text(other.to_string()),
    }
}

/// Converts a polars frame into a dataset, keeping column order.
pub fn dataframe_to_dataset(df: &DataFrame) -> Result<Dataset> {
    let columns: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.as_str().to_string())
        .collect();
    let mut records: Vec<Vec<CellValue>> = (0..df.height())
        .map(|_| Vec::with_capacity(columns.len()))
        .collect();
    for column in df.get_columns() {
        for (row_idx, record) in records.iter_mut().enumerate() {
            record.push(any_to_cell(column.get(row_idx)?));
        }
    }
    Ok(Dataset::from_records(columns, records)?)
}

/// Reads a headed CSV file into a dataset.
pub fn read_csv(path: &Path, options: &IngestOptions) -> Result<Dataset> {
    let text = read_text(path)?;
    let infer_length = if options.infer_types {
        INFER_SCHEMA_ROWS
    } else {
        0
    };
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(infer_length))
        .into_reader_with_file_handle(Cursor::new(text))
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let dataset = dataframe_to_dataset(&df)?;
    debug!(
        path = %path.display(),
        rows = dataset.row_count(),
        columns = dataset.column_count(),
        "read csv"
    );
    Ok(dataset)
}

/// Writes `dataset` as CSV with a header row; missing cells are empty.
pub fn write_csv_to<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut out = ::csv::Writer::from_writer(writer);
    out.write_record(&dataset.columns)?;
    for row in &dataset.rows {
        let record: Vec<String> = dataset
            .columns
            .iter()
            .map(|column| row.get(column).as_text().into_owned())
            .collect();
        out.write_record(&record)?;
    }
    out.flush().map_err(::csv::Error::from)?;
    Ok(())
}

/// Writes `dataset` to a CSV file, replacing any existing file.
pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv_to(dataset, std::io::BufWriter::new(file))?;
    debug!(path = %path.display(), rows = dataset.row_count(), "wrote csv");
    Ok(())
}
