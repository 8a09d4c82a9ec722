//! Interquartile-range fences shared by outlier detection and treatment.

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Outlier fences `[q1 - k*iqr, q3 + k*iqr]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrFences {
    pub q1: f64,
    pub q3: f64,
    pub low: f64,
    pub high: f64,
}

impl IqrFences {
    /// Quartiles are read at sorted positions `floor(n/4)` and `floor(3n/4)`.
    pub fn compute(values: &[f64], multiplier: f64) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let n = sorted.len();
        let q1 = sorted[n / 4];
        let q3 = sorted[(n * 3) / 4];
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            low: q1 - multiplier * iqr,
            high: q3 + multiplier * iqr,
        })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.low, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fences_flag_single_high_value() {
        let fences = IqrFences::compute(&[1.0, 2.0, 3.0, 4.0, 100.0], 1.5).unwrap();
        assert_eq!((fences.q1, fences.q3), (2.0, 4.0));
        assert_eq!((fences.low, fences.high), (-1.0, 7.0));
        assert!(!fences.contains(100.0));
        assert_eq!(fences.clamp(100.0), 7.0);
    }

    #[test]
    fn empty_input_has_no_fences() {
        assert!(IqrFences::compute(&[], 1.5).is_none());
        assert!(mean(&[]).is_none());
    }

    proptest! {
        #[test]
        fn clamped_values_stay_inside(values in prop::collection::vec(-1e6f64..1e6, 1..60)) {
            let fences = IqrFences::compute(&values, 1.5).unwrap();
            prop_assert!(fences.low <= fences.high);
            for value in values {
                prop_assert!(fences.contains(fences.clamp(value)));
            }
        }
    }
}
