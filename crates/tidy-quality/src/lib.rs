//! Data quality issue detection and scoring.
//!
//! [`detect`] scans every column of a dataset and reports typed issues;
//! [`quality_score`] folds those issues into a single 0-100 score.

pub mod checks;
pub mod column;
pub mod detect;
pub mod score;

pub use checks::{FORMAT_RULES, FormatRule, format_rule, is_typo_pair};
pub use column::ColumnView;
pub use detect::{detect, detect_column, detect_with};
pub use score::quality_score;
