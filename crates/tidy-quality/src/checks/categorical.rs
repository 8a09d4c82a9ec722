//! Drift within categorical label sets.
//!
//! A column is categorical when it holds text, is not an identifier, and
//! has a bounded number of distinct lower-cased labels. Email, phone and
//! date columns are left to their format checks.

use std::collections::HashSet;

use rapidfuzz::distance::levenshtein;
use tidy_common::normalize;
use tidy_model::{DetectOptions, Issue, IssueKind, Severity};

use super::format_rule;
use crate::column::ColumnView;

/// Pairs quoted in descriptions.
const PAIR_SAMPLES: usize = 5;
/// Largest edit distance treated as a typo.
const MAX_TYPO_DISTANCE: usize = 2;
/// Largest length difference for a contained label variant.
const MAX_VARIANT_LENGTH_GAP: usize = 3;

pub fn check(column: &ColumnView<'_>, options: &DetectOptions) -> Vec<Issue> {
    if format_rule(column.name).is_some()
        || !column.is_categorical(options.categorical_min, options.categorical_max)
    {
        return Vec::new();
    }
    let labels = column.distinct_lower();
    [
        capitalization(column, labels.len()),
        typos(column, &labels),
        variants(column, &labels),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Labels that differ only by case, e.g. `India` / `india`.
fn capitalization(column: &ColumnView<'_>, distinct_lower: usize) -> Option<Issue> {
    let exact: HashSet<&str> = column.present_text().collect();
    let extra = exact.len().saturating_sub(distinct_lower);
    if extra == 0 {
        return None;
    }
    Some(Issue::new(
        IssueKind::CapitalizationInconsistency,
        column.name,
        extra as u64,
        Severity::Warning,
        format!(
            "{} distinct spellings collapse to {distinct_lower} labels when case is ignored",
            exact.len()
        ),
    ))
}

/// Whether two distinct labels are within typo distance of each other.
pub fn is_typo_pair(a: &str, b: &str) -> bool {
    let distance = levenshtein::distance(a.chars(), b.chars());
    distance > 0 && distance <= MAX_TYPO_DISTANCE
}

fn typos(column: &ColumnView<'_>, labels: &[String]) -> Option<Issue> {
    let pairs = label_pairs(labels, is_typo_pair);
    pair_issue(
        column,
        IssueKind::TyposMislabels,
        Severity::Warning,
        &pairs,
        "similar labels that may be typos",
    )
}

/// One normalized label that prefixes another of similar length, e.g.
/// `y` / `yes`. Suffixes are ignored so `male` / `female` stay apart.
fn variants(column: &ColumnView<'_>, labels: &[String]) -> Option<Issue> {
    let normalized: Vec<String> = labels.iter().map(|label| normalize(label)).collect();
    let pairs = label_pairs(&normalized, |a, b| {
        let gap = a.chars().count().abs_diff(b.chars().count());
        !a.is_empty()
            && !b.is_empty()
            && gap <= MAX_VARIANT_LENGTH_GAP
            && (a.starts_with(b) || b.starts_with(a))
    });
    pair_issue(
        column,
        IssueKind::NormalizeCategory,
        Severity::Info,
        &pairs,
        "label variants that could share one category",
    )
}

fn label_pairs<'l>(
    labels: &'l [String],
    related: impl Fn(&str, &str) -> bool,
) -> Vec<(&'l str, &'l str)> {
    let mut pairs = Vec::new();
    for (i, a) in labels.iter().enumerate() {
        for b in &labels[i + 1..] {
            if a != b && related(a, b) {
                pairs.push((a.as_str(), b.as_str()));
            }
        }
    }
    pairs
}

fn pair_issue(
    column: &ColumnView<'_>,
    kind: IssueKind,
    severity: Severity,
    pairs: &[(&str, &str)],
    what: &str,
) -> Option<Issue> {
    if pairs.is_empty() {
        return None;
    }
    let shown = pairs
        .iter()
        .take(PAIR_SAMPLES)
        .map(|(a, b)| format!("{a} \u{2194} {b}"))
        .collect::<Vec<_>>()
        .join(", ");
    Some(Issue::new(
        kind,
        column.name,
        pairs.len() as u64,
        severity,
        format!("{} {what}: {shown}", pairs.len()),
    ))
}
