//! Batched record-linkage runs.

use std::ops::Range;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{debug, info, info_span, warn};

use tidy_model::{
    Dataset, FieldMapping, LinkOptions, LinkReport, LinkSummary, MatchBucket, MatchMode,
    MatchResult, MatchThresholds,
};

use crate::blocking::BlockingIndex;
use crate::classifier::{Classified, best_candidate, classify_row};
use crate::error::{LinkError, Result};
use crate::field::MappedField;

/// Progress callback receiving `(completed_batches, total_batches)`.
pub type ProgressFn = dyn Fn(usize, usize) + Send + Sync;

/// Shared flag a host sets to stop a run at the next batch boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

struct BatchOutcome {
    results: Vec<(MatchBucket, MatchResult)>,
    candidate_pairs: u64,
}

/// One configured matching run.
pub struct Linker<'a> {
    mapping: &'a FieldMapping,
    mode: MatchMode,
    options: LinkOptions,
    cancel: Option<CancelToken>,
    progress: Option<&'a (dyn Fn(usize, usize) + Send + Sync + 'a)>,
}

impl<'a> Linker<'a> {
    pub fn new(mapping: &'a FieldMapping, mode: MatchMode) -> Self {
        Self {
            mapping,
            mode,
            options: LinkOptions::default(),
            cancel: None,
            progress: None,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: LinkOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: &'a (dyn Fn(usize, usize) + Send + Sync + 'a)) -> Self {
        self.progress = Some(progress);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    /// Classifies every row of `a` against `b`.
    ///
    /// Fails only when the run is cancelled; a cancelled run returns no
    /// partial results.
    pub fn run(&self, a: &Dataset, b: &Dataset) -> Result<LinkReport> {
        let span = info_span!(
            "link",
            rows_a = a.row_count(),
            rows_b = b.row_count(),
            mode = %self.mode
        );
        let _guard = span.enter();

        let fields = resolve_fields(self.mapping, a, b);
        let thresholds = MatchThresholds::for_mode(self.mode);
        let index = BlockingIndex::build(b, &fields, self.options.fallback_cap);
        let batches = batch_ranges(a.row_count(), self.options.batch_size);
        let total = batches.len();
        let completed = AtomicUsize::new(0);

        let score_batch = |range: &Range<usize>| -> Option<BatchOutcome> {
            if self.is_cancelled() {
                return None;
            }
            let mut outcome = BatchOutcome {
                results: Vec::with_capacity(range.len()),
                candidate_pairs: 0,
            };
            for a_index in range.clone() {
                let row_a = &a.rows[a_index];
                let candidates = if fields.is_empty() {
                    Vec::new()
                } else {
                    index.candidates(row_a)
                };
                outcome.candidate_pairs += candidates.len() as u64;
                let best = best_candidate(&fields, row_a, b, &candidates, self.mode);
                outcome
                    .results
                    .push(classify_row(a_index, row_a, best, b, &thresholds));
            }
            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
            debug!(
                start = range.start,
                end = range.end,
                candidate_pairs = outcome.candidate_pairs,
                "scored batch"
            );
            if let Some(progress) = self.progress {
                progress(done, total);
            }
            Some(outcome)
        };

        let outcomes: Vec<Option<BatchOutcome>> = if self.options.parallel {
            batches.par_iter().map(&score_batch).collect()
        } else {
            let mut outcomes = Vec::with_capacity(total);
            for range in &batches {
                let outcome = score_batch(range);
                let stop = outcome.is_none();
                outcomes.push(outcome);
                if stop {
                    break;
                }
            }
            outcomes
        };

        if outcomes.len() < total || outcomes.iter().any(Option::is_none) {
            let completed_batches = completed.load(Ordering::SeqCst);
            warn!(completed_batches, total_batches = total, "matching cancelled");
            return Err(LinkError::Cancelled {
                completed_batches,
                total_batches: total,
            });
        }

        let mut classified = Classified::default();
        let mut candidate_pairs = 0;
        for outcome in outcomes.into_iter().flatten() {
            candidate_pairs += outcome.candidate_pairs;
            classified.extend(outcome.results);
        }

        let summary = LinkSummary {
            rows_a: a.row_count(),
            rows_b: b.row_count(),
            exact: classified.exact.len(),
            possible: classified.possible.len(),
            unmatched: classified.unmatched.len(),
            candidate_pairs,
            mode: self.mode,
            thresholds,
        };
        info!(
            exact = summary.exact,
            possible = summary.possible,
            unmatched = summary.unmatched,
            candidate_pairs,
            "matching complete"
        );
        Ok(LinkReport {
            exact: classified.exact,
            possible: classified.possible,
            unmatched: classified.unmatched,
            summary,
        })
    }
}

/// Runs one matching pass with optional cancellation and progress reporting.
pub fn link(
    a: &Dataset,
    b: &Dataset,
    mapping: &FieldMapping,
    mode: MatchMode,
    options: &LinkOptions,
    cancel: Option<&CancelToken>,
    progress: Option<&ProgressFn>,
) -> Result<LinkReport> {
    let mut linker = Linker::new(mapping, mode).with_options(options.clone());
    if let Some(cancel) = cancel {
        linker = linker.with_cancel(cancel.clone());
    }
    if let Some(progress) = progress {
        linker = linker.with_progress(progress);
    }
    linker.run(a, b)
}

/// Mapping entries present in both datasets.
fn resolve_fields(mapping: &FieldMapping, a: &Dataset, b: &Dataset) -> Vec<MappedField> {
    let mut fields = Vec::with_capacity(mapping.len());
    for pair in mapping.pairs() {
        if !a.has_column(&pair.left) || !b.has_column(&pair.right) {
            warn!(
                left = %pair.left,
                right = %pair.right,
                "mapped column missing from a dataset; skipped"
            );
            continue;
        }
        let field = MappedField::new(pair);
        debug!(
            left = %field.left,
            right = %field.right,
            kind = ?field.kind,
            weight = field.weight,
            "mapped field"
        );
        fields.push(field);
    }
    if fields.is_empty() {
        warn!("no mapped column exists in both datasets; every row is unmatched");
    }
    fields
}

fn batch_ranges(rows: usize, batch_size: usize) -> Vec<Range<usize>> {
    let size = batch_size.max(1);
    (0..rows)
        .step_by(size)
        .map(|start| start..(start + size).min(rows))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batches_cover_every_row_once() {
        assert_eq!(batch_ranges(5, 2), vec![0..2, 2..4, 4..5]);
        assert_eq!(batch_ranges(0, 500), Vec::<Range<usize>>::new());
        assert_eq!(batch_ranges(3, 0), vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn token_is_shared_between_clones() {
        let token = CancelToken::new();
        let handle = token.clone();
        assert!(!token.is_cancelled());
        handle.cancel();
        assert!(token.is_cancelled());
    }
}
