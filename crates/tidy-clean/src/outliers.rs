//! Outlier treatment using the same IQR fences the detector reports.

use tidy_common::{IqrFences, cell_number, mean, round_to};
use tidy_model::{CellValue, Dataset, OutlierBounds, OutlierStrategy};
use tracing::debug;

/// Caps, replaces or removes values of `column` outside the IQR fences.
///
/// `bounds` only applies to [`OutlierStrategy::CapAtThreshold`] and
/// overrides the computed fences. Cells are read as the detector reads
/// them, so text such as `"$50"` is non-numeric and never touched.
pub fn handle_outliers(
    dataset: &mut Dataset,
    column: &str,
    strategy: OutlierStrategy,
    bounds: Option<OutlierBounds>,
    iqr_multiplier: f64,
) {
    let numbers: Vec<Option<f64>> = dataset
        .column_values(column)
        .map(cell_number)
        .collect();
    let present: Vec<f64> = numbers.iter().flatten().copied().collect();
    let Some(fences) = IqrFences::compute(&present, iqr_multiplier) else {
        debug!(column, "no numeric values, nothing to treat");
        return;
    };

    match strategy {
        OutlierStrategy::CapAtThreshold => {
            let (low, high) = match bounds {
                Some(OutlierBounds { low, high }) if low <= high => (low, high),
                Some(OutlierBounds { low, high }) => (high, low),
                None => (fences.low, fences.high),
            };
            replace_where(dataset, column, &numbers, |value| {
                (value < low || value > high).then(|| value.max(low).min(high))
            });
        }
        OutlierStrategy::ReplaceWithMean => {
            let inside: Vec<f64> = present
                .iter()
                .copied()
                .filter(|v| fences.contains(*v))
                .collect();
            let Some(center) = mean(&inside) else {
                return;
            };
            let center = round_to(center, 6);
            replace_where(dataset, column, &numbers, |value| {
                (!fences.contains(value)).then_some(center)
            });
        }
        OutlierStrategy::Remove => {
            let mut flags = numbers.iter();
            dataset.rows.retain(|_| match flags.next() {
                Some(Some(value)) => fences.contains(*value),
                _ => true,
            });
        }
    }
}

fn replace_where(
    dataset: &mut Dataset,
    column: &str,
    numbers: &[Option<f64>],
    replacement: impl Fn(f64) -> Option<f64>,
) {
    for (row, number) in dataset.rows.iter_mut().zip(numbers) {
        if let Some(new) = number.and_then(&replacement) {
            row.set(column, CellValue::Number(new));
        }
    }
}
