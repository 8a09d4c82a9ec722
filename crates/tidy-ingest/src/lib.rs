//! File adapters for tidy datasets.
//!
//! The engine itself works on in-memory [`Dataset`](tidy_model::Dataset)s;
//! this crate loads them from CSV (polars reader) or JSON and writes them
//! back out.
//!
//! ```ignore
//! use std::path::Path;
//! use tidy_ingest::{IngestOptions, read_csv, write_csv};
//!
//! let dataset = read_csv(Path::new("customers.csv"), &IngestOptions::default())?;
//! write_csv(&dataset, Path::new("customers.clean.csv"))?;
//! ```

mod csv;
mod error;
mod json;

use std::path::Path;

pub use crate::csv::{
    IngestOptions, any_to_cell, dataframe_to_dataset, read_csv, write_csv, write_csv_to,
};
pub use error::{IngestError, Result};
pub use json::{parse_json, read_json, write_json};

use tidy_model::Dataset;

/// Reads a dataset, choosing JSON for `.json` files and CSV otherwise.
pub fn read_dataset(path: &Path, options: &IngestOptions) -> Result<Dataset> {
    if has_json_extension(path) {
        read_json(path)
    } else {
        read_csv(path, options)
    }
}

/// Writes a dataset, choosing JSON for `.json` files and CSV otherwise.
pub fn write_dataset(dataset: &Dataset, path: &Path) -> Result<()> {
    if has_json_extension(path) {
        write_json(dataset, path)
    } else {
        write_csv(dataset, path)
    }
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(std::ffi::OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
