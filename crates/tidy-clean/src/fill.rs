//! Missing value imputation.

use std::collections::HashMap;

use tidy_common::{cell_number_lenient, fold_key, is_empty, mean, round_to};
use tidy_model::{CellValue, Dataset, FillStrategy};
use tracing::debug;

use crate::infer::{ColumnType, infer_type};

/// Fill empty cells of `column` using `strategy`.
///
/// Numeric strategies on a non-numeric column fall back to
/// forward/backward fill for dates and mode for text. Non-empty cells are
/// re-parsed to the inferred type.
pub fn fill_missing(dataset: &mut Dataset, column: &str, strategy: FillStrategy) {
    let cells: Vec<CellValue> = dataset.column_values(column).cloned().collect();
    let column_type = infer_type(&cells);
    let effective = match (strategy.is_numeric(), column_type) {
        (true, ColumnType::Date) => FillStrategy::ForwardBackward,
        (true, ColumnType::String) => FillStrategy::Mode,
        _ => strategy,
    };
    if effective != strategy {
        debug!(column, ?strategy, ?effective, "numeric fill on non-numeric column");
    }

    let mut values: Vec<CellValue> = cells
        .iter()
        .map(|cell| canonical(cell, column_type))
        .collect();
    let numbers: Vec<f64> = values
        .iter()
        .filter_map(|cell| match cell {
            CellValue::Number(n) => Some(*n),
            _ => None,
        })
        .collect();

    match effective {
        FillStrategy::Mean => {
            let fill = mean(&numbers).map(|m| CellValue::Number(round_to(m, 2)));
            fill_with(&mut values, fill);
        }
        FillStrategy::Median => {
            let fill = median(&numbers).map(|m| CellValue::Number(round_to(m, 2)));
            fill_with(&mut values, fill);
        }
        FillStrategy::Mode => {
            let mode = mode(&values);
            fill_with(&mut values, mode);
        }
        FillStrategy::ForwardBackward => forward_backward(&mut values),
        FillStrategy::Interpolate => interpolate(&mut values),
        FillStrategy::LeaveNull => {}
    }
    dataset.set_column(column, values);
}

/// Empty cells become missing; others are trimmed or parsed as numbers.
fn canonical(cell: &CellValue, column_type: ColumnType) -> CellValue {
    if is_empty(cell) {
        return CellValue::Missing;
    }
    match (cell, column_type) {
        (CellValue::Text(text), ColumnType::Number) => cell_number_lenient(cell)
            .map_or_else(|| CellValue::Text(text.trim().to_string()), CellValue::Number),
        (CellValue::Text(text), _) => CellValue::Text(text.trim().to_string()),
        _ => cell.clone(),
    }
}

fn fill_with(values: &mut [CellValue], fill: Option<CellValue>) {
    let Some(fill) = fill else {
        return;
    };
    for value in values.iter_mut().filter(|value| value.is_missing()) {
        *value = fill.clone();
    }
}

fn median(numbers: &[f64]) -> Option<f64> {
    if numbers.is_empty() {
        return None;
    }
    let mut sorted = numbers.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Most frequent value by case-folded key; ties go to the first seen.
fn mode(values: &[CellValue]) -> Option<CellValue> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (index, value) in values.iter().enumerate() {
        if value.is_missing() {
            continue;
        }
        counts.entry(fold_key(value)).or_insert((0, index)).0 += 1;
    }
    counts
        .values()
        .max_by(|(count_a, first_a), (count_b, first_b)| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(_, first)| values[*first].clone())
}

/// Carry the previous value forward, then fill a leading gap backwards.
fn forward_backward(values: &mut [CellValue]) {
    let mut last: Option<CellValue> = None;
    for value in values.iter_mut() {
        if value.is_missing() {
            if let Some(previous) = &last {
                *value = previous.clone();
            }
        } else {
            last = Some(value.clone());
        }
    }
    let mut next: Option<CellValue> = None;
    for value in values.iter_mut().rev() {
        if value.is_missing() {
            if let Some(following) = &next {
                *value = following.clone();
            }
        } else {
            next = Some(value.clone());
        }
    }
}

/// Linear interpolation between numeric neighbours; edges take the
/// nearest known value.
fn interpolate(values: &mut [CellValue]) {
    let known: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| match value {
            CellValue::Number(n) => Some((index, *n)),
            _ => None,
        })
        .collect();
    if known.is_empty() {
        return;
    }
    for index in 0..values.len() {
        if !values[index].is_missing() {
            continue;
        }
        let after = known.partition_point(|(k, _)| *k < index);
        let filled = match (after.checked_sub(1).map(|i| known[i]), known.get(after)) {
            (Some((i0, v0)), Some(&(i1, v1))) => {
                v0 + (v1 - v0) * (index - i0) as f64 / (i1 - i0) as f64
            }
            (Some((_, v0)), None) => v0,
            (None, Some(&(_, v1))) => v1,
            (None, None) => continue,
        };
        values[index] = CellValue::Number(round_to(filled, 6));
    }
}
