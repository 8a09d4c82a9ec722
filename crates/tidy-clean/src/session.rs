//! Multi-step cleaning with before/after quality tracking.

use std::fmt;

use serde::Serialize;
use tidy_model::{
    CleaningOperation, Dataset, DetectOptions, Issue, IssueKind, Rename, compose_renames,
    remap_issues,
};
use tidy_quality::{detect_with, quality_score};
use tracing::{info, info_span};

use crate::apply::apply_with;

/// Share of the original issues resolved by a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CleaningProgress {
    pub fixed: usize,
    pub total: usize,
    pub fraction: f64,
}

impl CleaningProgress {
    pub fn new(before: usize, after: usize) -> Self {
        let fixed = before.saturating_sub(after);
        let fraction = if before == 0 {
            1.0
        } else {
            fixed as f64 / before as f64
        };
        Self {
            fixed,
            total: before,
            fraction,
        }
    }

    /// `"fixed/total"`.
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CleaningProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.fixed, self.total)
    }
}

/// Outcome of [`CleaningSession::run`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleaningReport {
    pub dataset: Dataset,
    /// Issues found before cleaning, with columns projected through
    /// `renames`.
    pub issues_before: Vec<Issue>,
    pub issues_after: Vec<Issue>,
    pub score_before: u8,
    pub score_after: u8,
    /// Cumulative header renames across all operations.
    pub renames: Vec<Rename>,
    pub progress: CleaningProgress,
    /// Operations that left the dataset unchanged.
    pub skipped: Vec<String>,
}

/// Applies a list of operations in order and re-scores the result.
#[derive(Debug, Clone, Default)]
pub struct CleaningSession {
    options: DetectOptions,
}

impl CleaningSession {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(mut self, options: DetectOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &DetectOptions {
        &self.options
    }

    /// Runs `operations` against `dataset`.
    ///
    /// Column references in later operations follow earlier header renames.
    pub fn run(&self, dataset: &Dataset, operations: &[CleaningOperation]) -> CleaningReport {
        let span = info_span!("clean", operations = operations.len());
        let _guard = span.enter();

        let mut issues_before = detect_with(dataset, &self.options);
        let score_before = quality_score(dataset, &issues_before);

        let mut current = dataset.clone();
        let mut renames: Vec<Rename> = Vec::new();
        let mut skipped = Vec::new();
        for operation in operations {
            let operation = operation.remapped(&renames);
            let cleaned = apply_with(&current, &operation, &self.options);
            if !cleaned.changed {
                skipped.push(operation.name().to_string());
            }
            if !cleaned.renames.is_empty() {
                renames = compose_renames(&renames, &cleaned.renames);
            }
            current = cleaned.dataset;
        }

        remap_issues(&renames, &mut issues_before);
        let issues_after = detect_with(&current, &self.options);
        let score_after = quality_score(&current, &issues_after);
        let progress = CleaningProgress::new(issues_before.len(), issues_after.len());
        info!(
            score_before,
            score_after,
            issues_before = issues_before.len(),
            issues_after = issues_after.len(),
            "cleaning finished"
        );

        CleaningReport {
            dataset: current,
            issues_before,
            issues_after,
            score_before,
            score_after,
            renames,
            progress,
            skipped,
        }
    }
}

/// One remediation per distinct issue, in a safe application order: empty
/// columns are dropped first and headers are standardized last so earlier
/// operations still see the original names.
pub fn suggest_operations(issues: &[Issue]) -> Vec<CleaningOperation> {
    let mut operations: Vec<CleaningOperation> = Vec::new();
    let mut push = |operation: CleaningOperation| {
        if !operations.contains(&operation) {
            operations.push(operation);
        }
    };
    let rank = |kind: IssueKind| match kind {
        IssueKind::EmptyColumn => 0,
        IssueKind::HeaderInconsistency => 2,
        _ => 1,
    };
    let mut ordered: Vec<&Issue> = issues.iter().collect();
    ordered.sort_by_key(|issue| rank(issue.kind));
    for issue in ordered {
        push(issue.kind.suggested_operation(&issue.column));
    }
    operations
}
