//! Cleaning operation requests and header renames.
//!
//! Strategy enums deserialize from either their snake_case identifier or
//! the human label a UI shows (`"Keep First"`, `"Cap at Threshold"`).

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::issue::Issue;

/// Lower-cases a label and folds spaces and hyphens into underscores.
fn label_key(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

fn parse_label<T: Copy>(kind: &'static str, value: &str, table: &[(&str, T)]) -> Result<T> {
    let key = label_key(value);
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, variant)| *variant)
        .ok_or_else(|| ModelError::UnknownVariant {
            kind,
            value: value.to_string(),
        })
}

/// Imputation strategy for `fill_missing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum FillStrategy {
    Mean,
    Median,
    #[default]
    Mode,
    ForwardBackward,
    LeaveNull,
    Interpolate,
}

impl FillStrategy {
    const LABELS: &'static [(&'static str, Self)] = &[
        ("mean", Self::Mean),
        ("average", Self::Mean),
        ("median", Self::Median),
        ("mode", Self::Mode),
        ("most_frequent", Self::Mode),
        ("forward_backward", Self::ForwardBackward),
        ("forward_backward_fill", Self::ForwardBackward),
        ("ffill", Self::ForwardBackward),
        ("leave_null", Self::LeaveNull),
        ("null", Self::LeaveNull),
        ("interpolate", Self::Interpolate),
        ("linear", Self::Interpolate),
    ];

    /// Whether the strategy computes over parsed numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Mean | Self::Median | Self::Interpolate)
    }
}

impl TryFrom<String> for FillStrategy {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        parse_label("fill strategy", &value, Self::LABELS)
    }
}

/// Which occurrence of a duplicated value survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum DuplicateStrategy {
    #[default]
    KeepFirst,
    KeepLast,
    RemoveAll,
}

impl DuplicateStrategy {
    const LABELS: &'static [(&'static str, Self)] = &[
        ("keep_first", Self::KeepFirst),
        ("first", Self::KeepFirst),
        ("keep_last", Self::KeepLast),
        ("last", Self::KeepLast),
        ("remove_all", Self::RemoveAll),
        ("drop_all", Self::RemoveAll),
    ];
}

impl TryFrom<String> for DuplicateStrategy {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        parse_label("duplicate strategy", &value, Self::LABELS)
    }
}

/// Treatment of values outside the IQR fences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum OutlierStrategy {
    CapAtThreshold,
    #[default]
    ReplaceWithMean,
    Remove,
}

impl OutlierStrategy {
    const LABELS: &'static [(&'static str, Self)] = &[
        ("cap_at_threshold", Self::CapAtThreshold),
        ("cap", Self::CapAtThreshold),
        ("clip", Self::CapAtThreshold),
        ("replace_with_mean", Self::ReplaceWithMean),
        ("mean", Self::ReplaceWithMean),
        ("remove", Self::Remove),
        ("remove_rows", Self::Remove),
        ("drop", Self::Remove),
    ];
}

impl TryFrom<String> for OutlierStrategy {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        parse_label("outlier strategy", &value, Self::LABELS)
    }
}

/// Case folding applied by `normalize_case`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum CaseMethod {
    #[default]
    Lower,
    Upper,
    Title,
}

impl CaseMethod {
    const LABELS: &'static [(&'static str, Self)] = &[
        ("lower", Self::Lower),
        ("lowercase", Self::Lower),
        ("upper", Self::Upper),
        ("uppercase", Self::Upper),
        ("title", Self::Title),
        ("title_case", Self::Title),
    ];
}

impl TryFrom<String> for CaseMethod {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        parse_label("case method", &value, Self::LABELS)
    }
}

/// Direction of `convert_numeric_strings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum NumericChoice {
    #[default]
    ToNumeric,
    ToString,
}

impl NumericChoice {
    const LABELS: &'static [(&'static str, Self)] = &[
        ("to_numeric", Self::ToNumeric),
        ("numeric", Self::ToNumeric),
        ("to_number", Self::ToNumeric),
        ("to_string", Self::ToString),
        ("string", Self::ToString),
        ("text", Self::ToString),
    ];
}

impl TryFrom<String> for NumericChoice {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        parse_label("numeric conversion", &value, Self::LABELS)
    }
}

/// Caller-supplied clamp range for `cap_at_threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierBounds {
    pub low: f64,
    pub high: f64,
}

/// One remediation request.
///
/// A missing `column` deserializes to an empty name, which matches no
/// column and therefore applies as a no-op. Unknown `type` values map to
/// [`CleaningOperation::Unsupported`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CleaningOperation {
    FillMissing {
        #[serde(default)]
        column: String,
        #[serde(default, alias = "method")]
        strategy: FillStrategy,
    },
    HandleDuplicates {
        #[serde(default)]
        column: String,
        #[serde(default, alias = "method")]
        strategy: DuplicateStrategy,
    },
    HandleOutliers {
        #[serde(default)]
        column: String,
        #[serde(default, alias = "method")]
        strategy: OutlierStrategy,
        #[serde(default, alias = "threshold", skip_serializing_if = "Option::is_none")]
        bounds: Option<OutlierBounds>,
    },
    StandardizeDates {
        #[serde(default)]
        column: String,
    },
    StandardizePhones {
        #[serde(default)]
        column: String,
    },
    StandardizeEmails {
        #[serde(default)]
        column: String,
    },
    RemoveEmptyColumn {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        column: Option<String>,
    },
    StandardizeHeaders,
    NormalizeCase {
        #[serde(default)]
        column: String,
        #[serde(default, alias = "strategy")]
        method: CaseMethod,
    },
    NormalizeCategories {
        #[serde(default)]
        column: String,
    },
    FixCapitalizationInconsistency {
        #[serde(default)]
        column: String,
    },
    #[serde(alias = "fix_typos_mislabels")]
    FixTyposAndMislabels {
        #[serde(default)]
        column: String,
    },
    #[serde(alias = "convert_numeric_string")]
    ConvertNumericStrings {
        #[serde(default)]
        column: String,
        #[serde(default, alias = "method")]
        choice: NumericChoice,
    },
    RemoveInvisibleWhitespace {
        #[serde(default)]
        column: String,
    },
    FixCorruptedEncoding {
        #[serde(default)]
        column: String,
    },
    FixMixedDataTypes {
        #[serde(default)]
        column: String,
    },
    #[serde(other)]
    Unsupported,
}

impl CleaningOperation {
    /// Identifier of the operation, identical to its serialized `type`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FillMissing { .. } => "fill_missing",
            Self::HandleDuplicates { .. } => "handle_duplicates",
            Self::HandleOutliers { .. } => "handle_outliers",
            Self::StandardizeDates { .. } => "standardize_dates",
            Self::StandardizePhones { .. } => "standardize_phones",
            Self::StandardizeEmails { .. } => "standardize_emails",
            Self::RemoveEmptyColumn { .. } => "remove_empty_column",
            Self::StandardizeHeaders => "standardize_headers",
            Self::NormalizeCase { .. } => "normalize_case",
            Self::NormalizeCategories { .. } => "normalize_categories",
            Self::FixCapitalizationInconsistency { .. } => "fix_capitalization_inconsistency",
            Self::FixTyposAndMislabels { .. } => "fix_typos_and_mislabels",
            Self::ConvertNumericStrings { .. } => "convert_numeric_strings",
            Self::RemoveInvisibleWhitespace { .. } => "remove_invisible_whitespace",
            Self::FixCorruptedEncoding { .. } => "fix_corrupted_encoding",
            Self::FixMixedDataTypes { .. } => "fix_mixed_data_types",
            Self::Unsupported => "unsupported",
        }
    }

    /// Target column, or `None` for dataset-wide operations.
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::FillMissing { column, .. }
            | Self::HandleDuplicates { column, .. }
            | Self::HandleOutliers { column, .. }
            | Self::StandardizeDates { column }
            | Self::StandardizePhones { column }
            | Self::StandardizeEmails { column }
            | Self::NormalizeCase { column, .. }
            | Self::NormalizeCategories { column }
            | Self::FixCapitalizationInconsistency { column }
            | Self::FixTyposAndMislabels { column }
            | Self::ConvertNumericStrings { column, .. }
            | Self::RemoveInvisibleWhitespace { column }
            | Self::FixCorruptedEncoding { column }
            | Self::FixMixedDataTypes { column } => Some(column),
            Self::RemoveEmptyColumn { column } => column.as_deref(),
            Self::StandardizeHeaders | Self::Unsupported => None,
        }
    }

    fn column_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::FillMissing { column, .. }
            | Self::HandleDuplicates { column, .. }
            | Self::HandleOutliers { column, .. }
            | Self::StandardizeDates { column }
            | Self::StandardizePhones { column }
            | Self::StandardizeEmails { column }
            | Self::NormalizeCase { column, .. }
            | Self::NormalizeCategories { column }
            | Self::FixCapitalizationInconsistency { column }
            | Self::FixTyposAndMislabels { column }
            | Self::ConvertNumericStrings { column, .. }
            | Self::RemoveInvisibleWhitespace { column }
            | Self::FixCorruptedEncoding { column }
            | Self::FixMixedDataTypes { column } => Some(column),
            Self::RemoveEmptyColumn { column } => column.as_mut(),
            Self::StandardizeHeaders | Self::Unsupported => None,
        }
    }

    /// Copy of this operation targeting the renamed column, so requests
    /// written against the original headers survive `standardize_headers`.
    ///
    /// A name that is already a renamed header is kept as is.
    #[must_use]
    pub fn remapped(&self, renames: &[Rename]) -> Self {
        let mut operation = self.clone();
        if let Some(column) = operation.column_mut()
            && !renames.iter().any(|rename| rename.new == *column)
        {
            let target = remap_column(renames, column).to_string();
            *column = target;
        }
        operation
    }
}

/// A header rename produced by `standardize_headers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rename {
    pub old: String,
    pub new: String,
}

impl Rename {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }
}

/// Projects a column reference through `renames`.
///
/// Exact matches win; otherwise a trimmed, case-insensitive match is
/// accepted. Unrenamed columns come back unchanged.
pub fn remap_column<'a>(renames: &'a [Rename], column: &'a str) -> &'a str {
    if let Some(rename) = renames.iter().find(|rename| rename.old == column) {
        return &rename.new;
    }
    let wanted = column.trim().to_lowercase();
    renames
        .iter()
        .find(|rename| rename.old.trim().to_lowercase() == wanted)
        .map_or(column, |rename| rename.new.as_str())
}

/// Re-projects every issue's column through `renames`.
pub fn remap_issues(renames: &[Rename], issues: &mut [Issue]) {
    for issue in issues {
        let column = remap_column(renames, &issue.column).to_string();
        issue.column = column;
    }
}

/// Composes two rename steps into one cumulative mapping.
///
/// Identity entries are dropped from the result.
pub fn compose_renames(first: &[Rename], then: &[Rename]) -> Vec<Rename> {
    let mut composed: Vec<Rename> = first
        .iter()
        .map(|rename| {
            let new = then
                .iter()
                .find(|next| next.old == rename.new)
                .map_or(rename.new.as_str(), |next| next.new.as_str());
            Rename::new(rename.old.clone(), new)
        })
        .collect();
    for next in then {
        if !first.iter().any(|rename| rename.new == next.old) {
            composed.push(next.clone());
        }
    }
    composed.retain(|rename| rename.old != rename.new);
    composed
}
