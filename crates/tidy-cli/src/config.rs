//! Config file, operation list and `--map` parsing.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tidy_model::{CleaningOperation, DetectOptions, FieldMapping, LinkOptions};

/// Settings read from `--config`. Missing sections keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TidyConfig {
    pub detect: DetectOptions,
    pub link: LinkOptions,
}

impl TidyConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse config")
    }

    /// Loads `path`, or the defaults when no config file was given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("load config {}", path.display()))
    }
}

/// `[[operation]]` tables of a TOML operations file.
#[derive(Debug, Deserialize)]
struct OperationTable {
    #[serde(default)]
    operation: Vec<CleaningOperation>,
}

/// A JSON operations file: a bare array or `{"operations": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OperationList {
    Bare(Vec<CleaningOperation>),
    Wrapped { operations: Vec<CleaningOperation> },
}

pub fn parse_operations_json(text: &str) -> Result<Vec<CleaningOperation>> {
    let list: OperationList = serde_json::from_str(text).context("parse operations json")?;
    Ok(match list {
        OperationList::Bare(operations) | OperationList::Wrapped { operations } => operations,
    })
}

pub fn parse_operations_toml(text: &str) -> Result<Vec<CleaningOperation>> {
    let table: OperationTable = toml::from_str(text).context("parse operations toml")?;
    Ok(table.operation)
}

/// Reads an operations file, choosing the format by extension.
pub fn load_operations(path: &Path) -> Result<Vec<CleaningOperation>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read operations {}", path.display()))?;
    let is_toml = path
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let operations = if is_toml {
        parse_operations_toml(&text)
    } else {
        parse_operations_json(&text)
    };
    operations.with_context(|| format!("load operations {}", path.display()))
}

/// Parses `--map a=b` arguments into a field mapping.
pub fn parse_mapping(entries: &[String]) -> Result<FieldMapping> {
    let mut mapping = FieldMapping::new();
    for entry in entries {
        let Some((left, right)) = entry.split_once('=') else {
            bail!("invalid mapping `{entry}`: expected COLUMN_A=COLUMN_B");
        };
        let (left, right) = (left.trim(), right.trim());
        if left.is_empty() || right.is_empty() {
            bail!("invalid mapping `{entry}`: both column names are required");
        }
        mapping.push(left, right);
    }
    Ok(mapping)
}
