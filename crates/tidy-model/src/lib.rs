//! Core model types shared by the tidy crates.

pub mod dataset;
pub mod error;
pub mod issue;
pub mod linkage;
pub mod operation;
pub mod options;

pub use dataset::{CellValue, Dataset, Row};
pub use error::{ModelError, Result};
pub use issue::{Issue, IssueKind, Severity};
pub use linkage::{
    FieldMapping, FieldPair, LinkReport, LinkSummary, MatchBucket, MatchMode, MatchResult,
    MatchThresholds,
};
pub use operation::{
    CaseMethod, CleaningOperation, DuplicateStrategy, FillStrategy, NumericChoice, OutlierBounds,
    OutlierStrategy, Rename, compose_renames, remap_column, remap_issues,
};
pub use options::{DetectOptions, LinkOptions};
