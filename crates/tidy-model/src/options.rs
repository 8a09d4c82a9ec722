//! Configuration options for detection and linkage.

use serde::{Deserialize, Serialize};

/// Knobs for the issue detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectOptions {
    /// Share of empty cells above which missing values become an error.
    pub missing_error_ratio: f64,
    /// Fewest distinct labels for a column to count as categorical.
    pub categorical_min: usize,
    /// Most distinct labels for a column to count as categorical.
    pub categorical_max: usize,
    /// Fewest numeric values before outliers are evaluated.
    pub outlier_min_values: usize,
    /// Fence width in IQRs.
    pub iqr_multiplier: f64,
    /// Example values quoted in issue descriptions.
    pub sample_size: usize,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            missing_error_ratio: 0.10,
            categorical_min: 2,
            categorical_max: 50,
            outlier_min_values: 5,
            iqr_multiplier: 1.5,
            sample_size: 5,
        }
    }
}

/// Knobs for the record-linkage matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkOptions {
    /// A rows scored per batch; cancellation is checked between batches.
    pub batch_size: usize,
    /// Rows of B compared when a row has no blocking key in common.
    pub fallback_cap: usize,
    /// Score batches on the rayon thread pool.
    pub parallel: bool,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            batch_size: 500,
            fallback_cap: 2000,
            parallel: true,
        }
    }
}

impl LinkOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    #[must_use]
    pub fn with_fallback_cap(mut self, cap: usize) -> Self {
        self.fallback_cap = cap;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let options: LinkOptions = serde_json::from_str(r#"{"fallback_cap":10}"#).unwrap();
        assert_eq!(options.fallback_cap, 10);
        assert_eq!(options.batch_size, 500);
        assert!(options.parallel);
    }

    #[test]
    fn batch_size_is_never_zero() {
        assert_eq!(LinkOptions::new().with_batch_size(0).batch_size, 1);
    }
}
