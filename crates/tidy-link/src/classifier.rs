//! Match classifier.
//!
//! A row pair scores `Σ(field score × weight) / Σ(weight)` over the mapped
//! fields where at least one side has a value; a field empty on one side
//! only scores 0. Each A row keeps its single best candidate, earliest
//! first on ties, and lands in exactly one bucket.

use std::collections::BTreeMap;

use tidy_common::is_empty;
use tidy_model::{Dataset, MatchBucket, MatchMode, MatchResult, MatchThresholds, Row};

use crate::field::MappedField;

/// Weighted score of one row pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PairScore {
    pub score: f64,
    /// Per-field scores keyed by the A-side column.
    pub comp_vector: BTreeMap<String, f64>,
}

/// Scores `row_a` against `row_b`, or `None` when no field has a value on
/// either side.
pub fn score_pair(
    fields: &[MappedField],
    row_a: &Row,
    row_b: &Row,
    mode: MatchMode,
) -> Option<PairScore> {
    let mut comp_vector = BTreeMap::new();
    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    for field in fields {
        let (left, right) = (row_a.get(&field.left), row_b.get(&field.right));
        let score = match (is_empty(left), is_empty(right)) {
            (true, true) => continue,
            (false, false) => field.kind.score(&left.as_text(), &right.as_text(), mode),
            _ => 0.0,
        };
        weighted += score * field.weight;
        total_weight += field.weight;
        comp_vector.insert(field.left.clone(), score);
    }
    (total_weight > 0.0).then(|| PairScore {
        score: (weighted / total_weight).clamp(0.0, 1.0),
        comp_vector,
    })
}

/// Best-scoring candidate of `row_a` among `candidates` rows of `b`.
///
/// A later candidate replaces the current best only with a strictly
/// higher score.
pub fn best_candidate(
    fields: &[MappedField],
    row_a: &Row,
    b: &Dataset,
    candidates: &[usize],
    mode: MatchMode,
) -> Option<(usize, PairScore)> {
    let mut best: Option<(usize, PairScore)> = None;
    for &b_index in candidates {
        let Some(row_b) = b.rows.get(b_index) else {
            continue;
        };
        let Some(pair) = score_pair(fields, row_a, row_b, mode) else {
            continue;
        };
        if best.as_ref().is_none_or(|(_, current)| pair.score > current.score) {
            best = Some((b_index, pair));
        }
    }
    best
}

/// Builds the result for one A row from its best candidate.
///
/// Unmatched rows keep the best sub-threshold score and per-field scores
/// but carry no B row.
pub fn classify_row(
    a_index: usize,
    row_a: &Row,
    best: Option<(usize, PairScore)>,
    b: &Dataset,
    thresholds: &MatchThresholds,
) -> (MatchBucket, MatchResult) {
    let Some((b_index, pair)) = best else {
        let result = MatchResult {
            a_index,
            row_a: row_a.clone(),
            b_index: None,
            row_b: None,
            similarity: 0.0,
            comp_vector: BTreeMap::new(),
        };
        return (MatchBucket::Unmatched, result);
    };
    let bucket = thresholds.categorize(pair.score);
    let (b_index, row_b) = match bucket {
        MatchBucket::Unmatched => (None, None),
        MatchBucket::Exact | MatchBucket::Possible => {
            (Some(b_index), b.rows.get(b_index).cloned())
        }
    };
    let result = MatchResult {
        a_index,
        row_a: row_a.clone(),
        b_index,
        row_b,
        similarity: pair.score,
        comp_vector: pair.comp_vector,
    };
    (bucket, result)
}

/// Results partitioned by bucket, each in A-row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified {
    pub exact: Vec<MatchResult>,
    pub possible: Vec<MatchResult>,
    pub unmatched: Vec<MatchResult>,
}

impl Classified {
    pub fn push(&mut self, bucket: MatchBucket, result: MatchResult) {
        match bucket {
            MatchBucket::Exact => self.exact.push(result),
            MatchBucket::Possible => self.possible.push(result),
            MatchBucket::Unmatched => self.unmatched.push(result),
        }
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.possible.len() + self.unmatched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Extend<(MatchBucket, MatchResult)> for Classified {
    fn extend<I: IntoIterator<Item = (MatchBucket, MatchResult)>>(&mut self, iter: I) {
        for (bucket, result) in iter {
            self.push(bucket, result);
        }
    }
}

/// Classifies every A row against its candidate B rows.
pub fn classify<I>(
    a: &Dataset,
    b: &Dataset,
    fields: &[MappedField],
    pairs: I,
    mode: MatchMode,
) -> Classified
where
    I: IntoIterator<Item = (usize, Vec<usize>)>,
{
    let thresholds = MatchThresholds::for_mode(mode);
    let mut classified = Classified::default();
    for (a_index, candidates) in pairs {
        let Some(row_a) = a.rows.get(a_index) else {
            continue;
        };
        let best = best_candidate(fields, row_a, b, &candidates, mode);
        let (bucket, result) = classify_row(a_index, row_a, best, b, &thresholds);
        classified.push(bucket, result);
    }
    classified
}

#[cfg(test)]
mod tests {
    use tidy_model::FieldMapping;

    use super::*;

    fn fields(mapping: &FieldMapping) -> Vec<MappedField> {
        mapping.pairs().iter().map(MappedField::new).collect()
    }

    #[test]
    fn row_score_is_the_weighted_mean_of_evaluable_fields() {
        let mapping = FieldMapping::new()
            .with("email", "email")
            .with("notes", "notes")
            .with("city", "city");
        let a = Row::new()
            .with("email", "js@x.com")
            .with("notes", "")
            .with("city", "Paris");
        let b = Row::new()
            .with("email", "js@x.com")
            .with("notes", "")
            .with("city", "");
        let pair = score_pair(&fields(&mapping), &a, &b, MatchMode::Advanced).unwrap();
        // email 1.0 x 5, city 0.0 x 1; notes skipped
        assert!((pair.score - 5.0 / 6.0).abs() < 1e-9);
        assert_eq!(pair.comp_vector.len(), 2);
        assert_eq!(pair.comp_vector["city"], 0.0);
    }

    #[test]
    fn pairs_without_values_are_not_scored() {
        let mapping = FieldMapping::new().with("name", "name");
        let empty = Row::new().with("name", " ");
        assert!(score_pair(&fields(&mapping), &empty, &empty, MatchMode::Basic).is_none());
    }

    #[test]
    fn ties_keep_the_first_candidate() {
        let mapping = FieldMapping::new().with("name", "name");
        let b = Dataset::from_rows(vec![
            Row::new().with("name", "Ann Lee"),
            Row::new().with("name", "Lee Ann"),
        ]);
        let row = Row::new().with("name", "Ann Lee");
        let (index, pair) =
            best_candidate(&fields(&mapping), &row, &b, &[0, 1], MatchMode::Advanced).unwrap();
        assert_eq!(index, 0);
        assert!(pair.score > 0.99);
        let (index, _) =
            best_candidate(&fields(&mapping), &row, &b, &[1, 0], MatchMode::Advanced).unwrap();
        assert_eq!(index, 1);
    }

    #[test]
    fn unmatched_rows_keep_the_best_score_without_a_b_row() {
        let mapping = FieldMapping::new().with("name", "name");
        let b = Dataset::from_rows(vec![Row::new().with("name", "Maria Garcia")]);
        let a = Dataset::from_rows(vec![Row::new().with("name", "Jonathan Smith")]);
        let classified = classify(
            &a,
            &b,
            &fields(&mapping),
            [(0, vec![0])],
            MatchMode::Advanced,
        );
        assert_eq!(classified.len(), 1);
        let result = &classified.unmatched[0];
        assert!(result.b_index.is_none());
        assert!(result.row_b.is_none());
        assert!(result.similarity > 0.0 && result.similarity < 0.75);
        assert!(result.comp_vector.contains_key("name"));
    }

    #[test]
    fn strict_mode_raises_the_bar() {
        let mapping = FieldMapping::new().with("email", "email");
        let b = Dataset::from_rows(vec![Row::new().with("email", "john@x.com")]);
        let a = Dataset::from_rows(vec![Row::new().with("email", "js@x.com")]);
        // same domain scores 0.9
        let advanced = classify(&a, &b, &fields(&mapping), [(0, vec![0])], MatchMode::Advanced);
        assert_eq!(advanced.exact.len(), 1);
        let strict = classify(&a, &b, &fields(&mapping), [(0, vec![0])], MatchMode::Strict);
        assert_eq!(strict.possible.len(), 1);
        assert_eq!(strict.possible[0].b_index, Some(0));
    }
}
