//! Command-line front end for profiling, cleaning and linking tabular data.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod summary;
pub mod types;
