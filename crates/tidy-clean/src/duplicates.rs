use std::collections::{HashMap, HashSet};

use tidy_common::fold_key;
use tidy_model::{Dataset, DuplicateStrategy};

/// Drops rows whose `column` value repeats, compared trimmed and
/// case-insensitively. Rows with an empty value are always kept and row
/// order is preserved.
pub fn handle_duplicates(dataset: &mut Dataset, column: &str, strategy: DuplicateStrategy) {
    let keys: Vec<String> = dataset.column_values(column).map(fold_key).collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut last_index: HashMap<&str, usize> = HashMap::new();
    for (index, key) in keys.iter().enumerate() {
        if key.is_empty() {
            continue;
        }
        *counts.entry(key.as_str()).or_default() += 1;
        last_index.insert(key.as_str(), index);
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let keep: Vec<bool> = keys
        .iter()
        .enumerate()
        .map(|(index, key)| {
            if key.is_empty() {
                return true;
            }
            match strategy {
                DuplicateStrategy::KeepFirst => seen.insert(key.as_str()),
                DuplicateStrategy::KeepLast => last_index.get(key.as_str()) == Some(&index),
                DuplicateStrategy::RemoveAll => counts.get(key.as_str()) == Some(&1),
            }
        })
        .collect();

    let mut flags = keep.into_iter();
    dataset.rows.retain(|_| flags.next().unwrap_or(true));
}
