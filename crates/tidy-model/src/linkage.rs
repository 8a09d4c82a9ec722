//! Record-linkage request and result types.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dataset::Row;
use crate::error::{ModelError, Result};

/// Matching mode selecting default algorithms and thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Token overlap only.
    Basic,
    /// Blended string similarity.
    #[default]
    Advanced,
    /// Edit-distance ratio with tighter thresholds.
    Strict,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "advanced" | "hybrid" => Ok(Self::Advanced),
            "strict" => Ok(Self::Strict),
            _ => Err(ModelError::UnknownVariant {
                kind: "match mode",
                value: s.to_string(),
            }),
        }
    }
}

/// Row-score cut-offs for one mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchThresholds {
    /// Minimum score for an exact match.
    pub exact: f64,
    /// Minimum score for a possible match.
    pub possible: f64,
}

impl MatchThresholds {
    pub fn for_mode(mode: MatchMode) -> Self {
        match mode {
            MatchMode::Strict => Self {
                exact: 0.95,
                possible: 0.85,
            },
            MatchMode::Basic | MatchMode::Advanced => Self {
                exact: 0.90,
                possible: 0.75,
            },
        }
    }

    /// Bucket for a best-candidate score.
    pub fn categorize(&self, score: f64) -> MatchBucket {
        if score >= self.exact {
            MatchBucket::Exact
        } else if score >= self.possible {
            MatchBucket::Possible
        } else {
            MatchBucket::Unmatched
        }
    }
}

/// Outcome bucket of one A row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchBucket {
    Exact,
    Possible,
    Unmatched,
}

/// One column pair to compare: `left` in dataset A, `right` in dataset B.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPair {
    pub left: String,
    pub right: String,
}

/// Caller-supplied column correspondence between two datasets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping {
    pairs: Vec<FieldPair>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.push(left, right);
        self
    }

    pub fn push(&mut self, left: impl Into<String>, right: impl Into<String>) {
        self.pairs.push(FieldPair {
            left: left.into(),
            right: right.into(),
        });
    }

    pub fn pairs(&self) -> &[FieldPair] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

impl<L: Into<String>, R: Into<String>> FromIterator<(L, R)> for FieldMapping {
    fn from_iter<I: IntoIterator<Item = (L, R)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (left, right) in iter {
            mapping.push(left, right);
        }
        mapping
    }
}

/// Best pairing found for one row of dataset A.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub a_index: usize,
    pub row_a: Row,
    pub b_index: Option<usize>,
    pub row_b: Option<Row>,
    /// Weighted row score in `[0, 1]`.
    pub similarity: f64,
    /// Per-field scores keyed by the A-side column name.
    pub comp_vector: BTreeMap<String, f64>,
}

/// Run totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSummary {
    pub rows_a: usize,
    pub rows_b: usize,
    pub exact: usize,
    pub possible: usize,
    pub unmatched: usize,
    pub candidate_pairs: u64,
    pub mode: MatchMode,
    pub thresholds: MatchThresholds,
}

/// Three-way partition of dataset A produced by one matching run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkReport {
    pub exact: Vec<MatchResult>,
    pub possible: Vec<MatchResult>,
    pub unmatched: Vec<MatchResult>,
    pub summary: LinkSummary,
}

impl LinkReport {
    /// Bucket a given A row landed in, if it was classified.
    pub fn bucket_of(&self, a_index: usize) -> Option<MatchBucket> {
        let contains = |results: &[MatchResult]| results.iter().any(|r| r.a_index == a_index);
        if contains(&self.exact) {
            Some(MatchBucket::Exact)
        } else if contains(&self.possible) {
            Some(MatchBucket::Possible)
        } else if contains(&self.unmatched) {
            Some(MatchBucket::Unmatched)
        } else {
            None
        }
    }
}
