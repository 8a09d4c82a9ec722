//! Data quality issue types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::operation::{
    CaseMethod, CleaningOperation, DuplicateStrategy, FillStrategy, NumericChoice, OutlierStrategy,
};

/// Issue severity level, ordered `Info < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth a look, usually cosmetic
    Info,
    /// Should review
    Warning,
    /// Must fix before the data is trusted
    Error,
}

impl Severity {
    /// Parse severity from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "info" => Some(Self::Info),
            "warning" | "warn" => Some(Self::Warning),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }

    /// Multiplier applied to an issue's count when scoring.
    pub fn weight(&self) -> u64 {
        match self {
            Self::Error => 2,
            Self::Warning | Self::Info => 1,
        }
    }
}

/// Class of defect an issue reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    EmptyColumn,
    MissingValues,
    HeaderInconsistency,
    DateFormat,
    PhoneFormat,
    EmailFormat,
    Duplicates,
    Outliers,
    InvisibleWhitespace,
    CorruptedEncoding,
    MixedDataTypes,
    CapitalizationInconsistency,
    TyposMislabels,
    NormalizeCategory,
    NormalizeCase,
    ConvertNumericString,
}

impl IssueKind {
    /// Stable identifier, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyColumn => "empty_column",
            Self::MissingValues => "missing_values",
            Self::HeaderInconsistency => "header_inconsistency",
            Self::DateFormat => "date_format",
            Self::PhoneFormat => "phone_format",
            Self::EmailFormat => "email_format",
            Self::Duplicates => "duplicates",
            Self::Outliers => "outliers",
            Self::InvisibleWhitespace => "invisible_whitespace",
            Self::CorruptedEncoding => "corrupted_encoding",
            Self::MixedDataTypes => "mixed_data_types",
            Self::CapitalizationInconsistency => "capitalization_inconsistency",
            Self::TyposMislabels => "typos_mislabels",
            Self::NormalizeCategory => "normalize_category",
            Self::NormalizeCase => "normalize_case",
            Self::ConvertNumericString => "convert_numeric_string",
        }
    }

    /// Remediation that resolves this kind of issue on `column`.
    pub fn suggested_operation(&self, column: &str) -> CleaningOperation {
        let column = column.to_string();
        match self {
            Self::EmptyColumn => CleaningOperation::RemoveEmptyColumn {
                column: Some(column),
            },
            Self::MissingValues => CleaningOperation::FillMissing {
                column,
                strategy: FillStrategy::default(),
            },
            Self::HeaderInconsistency => CleaningOperation::StandardizeHeaders,
            Self::DateFormat => CleaningOperation::StandardizeDates { column },
            Self::PhoneFormat => CleaningOperation::StandardizePhones { column },
            Self::EmailFormat => CleaningOperation::StandardizeEmails { column },
            Self::Duplicates => CleaningOperation::HandleDuplicates {
                column,
                strategy: DuplicateStrategy::default(),
            },
            Self::Outliers => CleaningOperation::HandleOutliers {
                column,
                strategy: OutlierStrategy::CapAtThreshold,
                bounds: None,
            },
            Self::InvisibleWhitespace => CleaningOperation::RemoveInvisibleWhitespace { column },
            Self::CorruptedEncoding => CleaningOperation::FixCorruptedEncoding { column },
            Self::MixedDataTypes => CleaningOperation::FixMixedDataTypes { column },
            Self::CapitalizationInconsistency => {
                CleaningOperation::FixCapitalizationInconsistency { column }
            }
            Self::TyposMislabels => CleaningOperation::FixTyposAndMislabels { column },
            Self::NormalizeCategory => CleaningOperation::NormalizeCategories { column },
            Self::NormalizeCase => CleaningOperation::NormalizeCase {
                column,
                method: CaseMethod::default(),
            },
            Self::ConvertNumericString => CleaningOperation::ConvertNumericStrings {
                column,
                choice: NumericChoice::default(),
            },
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One class of defect found in one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub column: String,
    pub count: u64,
    pub description: String,
    pub severity: Severity,
}

impl Issue {
    pub fn new(
        kind: IssueKind,
        column: impl Into<String>,
        count: u64,
        severity: Severity,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            column: column.into(),
            count,
            description: description.into(),
            severity,
        }
    }

    /// Weighted number of affected cells used by the quality score.
    pub fn weighted_count(&self) -> u64 {
        self.count.saturating_mul(self.severity.weight())
    }
}
