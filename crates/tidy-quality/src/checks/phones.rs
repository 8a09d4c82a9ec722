//! Phone number format drift.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tidy_model::{DetectOptions, Issue, IssueKind, Severity};

use super::describe_buckets;
use crate::column::ColumnView;

/// Format bucket of a phone number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PhoneShape {
    /// `+1 (555) 123-4567` or `+91 (98765 43210)`, the cleaned form.
    Canonical,
    /// `+1-555-123-4567`
    Standard,
    /// `555-123-4567`
    Dashed,
    /// `(555) 123-4567`
    Parenthesized,
    /// `5551234567`
    Plain,
    /// `555.123.4567`
    Dotted,
    /// `+44 7911123456`
    International,
    Other,
}

impl PhoneShape {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Canonical => "canonical",
            Self::Standard => "standard",
            Self::Dashed => "dashed",
            Self::Parenthesized => "parenthesized",
            Self::Plain => "plain",
            Self::Dotted => "dotted",
            Self::International => "international",
            Self::Other => "unrecognised",
        }
    }
}

static PHONE_RULES: LazyLock<Vec<(Regex, PhoneShape)>> = LazyLock::new(|| {
    [
        (
            r"^\+\d{1,3} (?:\(\d{3}\) \d{3}-\d{4}|\(\d{5} \d{5}\))$",
            PhoneShape::Canonical,
        ),
        (r"^\+1-\d{3}-\d{3}-\d{4}$", PhoneShape::Standard),
        (r"^\d{3}-\d{3}-\d{4}$", PhoneShape::Dashed),
        (r"^\(\d{3}\)\s?\d{3}-\d{4}$", PhoneShape::Parenthesized),
        (r"^\d{10}$", PhoneShape::Plain),
        (r"^\d{3}\.\d{3}\.\d{4}$", PhoneShape::Dotted),
        (r"^\+?\d{1,3}[-\s]?\d{4,14}$", PhoneShape::International),
    ]
    .into_iter()
    .map(|(pattern, shape)| (Regex::new(pattern).expect("phone regex"), shape))
    .collect()
});

pub fn classify_phone(raw: &str) -> PhoneShape {
    let value = raw.trim();
    PHONE_RULES
        .iter()
        .find(|(pattern, _)| pattern.is_match(value))
        .map_or(PhoneShape::Other, |(_, shape)| *shape)
}

/// Flag phone columns mixing formats or holding unrecognisable numbers.
///
/// The count is the number of values outside the most common recognised
/// format.
pub fn check(column: &ColumnView<'_>, _options: &DetectOptions) -> Vec<Issue> {
    let mut buckets: BTreeMap<PhoneShape, usize> = BTreeMap::new();
    for cell in &column.present {
        *buckets.entry(classify_phone(&cell.as_text())).or_default() += 1;
    }
    let has_other = buckets.contains_key(&PhoneShape::Other);
    if buckets.len() <= 1 && !has_other {
        return Vec::new();
    }
    let total: usize = buckets.values().sum();
    let dominant = buckets
        .iter()
        .filter(|(shape, _)| **shape != PhoneShape::Other)
        .map(|(_, count)| *count)
        .max()
        .unwrap_or(0);
    vec![Issue::new(
        IssueKind::PhoneFormat,
        column.name,
        (total - dominant) as u64,
        Severity::Warning,
        format!(
            "Inconsistent phone formats: {}",
            describe_buckets(&buckets, PhoneShape::label)
        ),
    )]
}
