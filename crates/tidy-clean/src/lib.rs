//! Cleaning operator.
//!
//! [`apply`] runs one [`CleaningOperation`](tidy_model::CleaningOperation)
//! against a copy of a dataset. [`CleaningSession`] chains several and
//! reports the quality before and after.

pub mod apply;
pub mod categories;
pub mod duplicates;
pub mod fill;
pub mod headers;
pub mod infer;
pub mod numeric;
pub mod outliers;
pub mod session;
pub mod standardize;
pub mod text;

pub use apply::{Cleaned, apply, apply_with};
pub use infer::{ColumnType, infer_type};
pub use session::{CleaningProgress, CleaningReport, CleaningSession, suggest_operations};
pub use standardize::{INVALID_EMAIL, INVALID_PHONE};
