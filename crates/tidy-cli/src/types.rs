use std::path::PathBuf;

use serde::Serialize;
use tidy_clean::CleaningReport;
use tidy_model::{Issue, LinkReport, Severity};

/// Outcome of `tidy profile`.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResult {
    pub file: PathBuf,
    pub rows: usize,
    pub columns: usize,
    pub score: u8,
    pub issues: Vec<Issue>,
}

impl ProfileResult {
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity == Severity::Error)
    }
}

/// Outcome of `tidy clean`.
#[derive(Debug, Clone)]
pub struct CleanResult {
    pub file: PathBuf,
    pub operations: usize,
    pub report: CleaningReport,
    pub output: Option<PathBuf>,
}

/// Outcome of `tidy link`.
#[derive(Debug, Clone)]
pub struct LinkResult {
    pub left: PathBuf,
    pub right: PathBuf,
    pub report: LinkReport,
    pub output: Option<PathBuf>,
}
