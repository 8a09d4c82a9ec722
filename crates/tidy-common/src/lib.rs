//! Shared utilities for tidy crates.
//!
//! This crate holds the value normalizer used by both detection and
//! linkage, plus the numeric, date and statistics helpers that cleaning
//! and detection must agree on.

pub mod dates;
pub mod normalize;
pub mod numeric;
pub mod stats;

// Re-export commonly used functions at crate root for convenience
pub use dates::{DateShape, classify_date, parse_date, parse_date_with, serial_to_date};
pub use normalize::{
    column_tokens, extract_domain, fold_key, has_mojibake, is_empty, is_empty_text,
    is_invisible, is_valid_email, normalize, normalize_cell, strip_invisible, tokenize_sort,
};
pub use numeric::{
    cell_number, cell_number_lenient, numeric_string_value, parse_f64, parse_lenient, round_to,
};
pub use stats::{IqrFences, mean};
