//! Blocking indexer.
//!
//! Rows of dataset B are bucketed by the first character of each
//! token-sorted name field and by the domain of each email field. A row of
//! A is only compared with the B rows sharing at least one bucket; a row
//! that shares none is compared with a capped prefix of B instead.

use std::collections::{BTreeSet, HashMap};

use tidy_common::{extract_domain, is_empty, tokenize_sort};
use tidy_model::{CellValue, Dataset, Row};

use crate::field::{FieldKind, MappedField};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum BlockKey {
    NameInitial { field: usize, initial: char },
    EmailDomain { field: usize, domain: String },
}

fn block_key(field: usize, kind: FieldKind, value: &CellValue) -> Option<BlockKey> {
    if is_empty(value) {
        return None;
    }
    match kind {
        FieldKind::Name => tokenize_sort(&value.as_text())
            .chars()
            .next()
            .map(|initial| BlockKey::NameInitial { field, initial }),
        FieldKind::Email => {
            let domain = extract_domain(&value.as_text());
            (!domain.is_empty()).then_some(BlockKey::EmailDomain { field, domain })
        }
        _ => None,
    }
}

/// Bucket index over dataset B.
#[derive(Debug, Clone)]
pub struct BlockingIndex {
    /// `(position in the mapping, kind, A-side column)` of every blocking field.
    fields: Vec<(usize, FieldKind, String)>,
    buckets: HashMap<BlockKey, Vec<usize>>,
    fallback: usize,
}

impl BlockingIndex {
    /// Indexes `b` on the name and email fields of `fields`.
    pub fn build(b: &Dataset, fields: &[MappedField], fallback_cap: usize) -> Self {
        let blocking: Vec<(usize, &MappedField)> = fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.kind.is_blocking())
            .collect();
        let mut buckets: HashMap<BlockKey, Vec<usize>> = HashMap::new();
        for (index, row) in b.rows.iter().enumerate() {
            for (position, field) in &blocking {
                if let Some(key) = block_key(*position, field.kind, row.get(&field.right)) {
                    buckets.entry(key).or_default().push(index);
                }
            }
        }
        tracing::debug!(
            blocking_fields = blocking.len(),
            buckets = buckets.len(),
            "built blocking index"
        );
        Self {
            fields: blocking
                .into_iter()
                .map(|(position, field)| (position, field.kind, field.left.clone()))
                .collect(),
            buckets,
            fallback: fallback_cap.min(b.row_count()),
        }
    }

    /// Number of distinct buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// B rows to compare with `row`, ascending.
    pub fn candidates(&self, row: &Row) -> Vec<usize> {
        let mut found = BTreeSet::new();
        for (position, kind, column) in &self.fields {
            if let Some(key) = block_key(*position, *kind, row.get(column))
                && let Some(rows) = self.buckets.get(&key)
            {
                found.extend(rows.iter().copied());
            }
        }
        if found.is_empty() {
            return (0..self.fallback).collect();
        }
        found.into_iter().collect()
    }

    /// Every candidate `(a_index, b_index)` pair for dataset A.
    pub fn pairs<'a>(&'a self, a: &'a Dataset) -> impl Iterator<Item = (usize, usize)> + 'a {
        a.rows.iter().enumerate().flat_map(move |(a_index, row)| {
            self.candidates(row)
                .into_iter()
                .map(move |b_index| (a_index, b_index))
        })
    }
}

#[cfg(test)]
mod tests {
    use tidy_model::FieldMapping;

    use super::*;

    fn fields(mapping: &FieldMapping) -> Vec<MappedField> {
        mapping.pairs().iter().map(MappedField::new).collect()
    }

    fn people(names: &[(&str, &str)]) -> Dataset {
        Dataset::from_rows(
            names
                .iter()
                .map(|(name, email)| Row::new().with("name", *name).with("email", *email))
                .collect(),
        )
    }

    #[test]
    fn reordered_names_share_a_bucket() {
        let b = people(&[("Smith John", ""), ("Alice Jones", ""), ("Bob Brown", "")]);
        let mapping = FieldMapping::new().with("name", "name");
        let index = BlockingIndex::build(&b, &fields(&mapping), 2000);
        let row = Row::new().with("name", "John Smith");
        assert_eq!(index.candidates(&row), vec![0]);
    }

    #[test]
    fn candidates_are_the_union_of_name_and_email_buckets() {
        let b = people(&[
            ("Zed Young", "zed@x.com"),
            ("Adam Ant", "adam@y.org"),
            ("Amy Archer", "amy@x.com"),
        ]);
        let mapping = FieldMapping::new()
            .with("name", "name")
            .with("email", "email");
        let index = BlockingIndex::build(&b, &fields(&mapping), 2000);
        let row = Row::new().with("name", "Ava Abbott").with("email", "ava@x.com");
        assert_eq!(index.candidates(&row), vec![0, 1, 2]);
        let row = Row::new().with("name", "Ava Abbott").with("email", "");
        assert_eq!(index.candidates(&row), vec![1, 2]);
    }

    #[test]
    fn rows_without_shared_buckets_fall_back_to_a_capped_prefix() {
        let b = people(&[("Ann", ""), ("Bea", ""), ("Cy", "")]);
        let mapping = FieldMapping::new().with("name", "name");
        let index = BlockingIndex::build(&b, &fields(&mapping), 2);
        let row = Row::new().with("name", "Zoe");
        assert_eq!(index.candidates(&row), vec![0, 1]);
        let row = Row::new().with("name", "");
        assert_eq!(index.candidates(&row), vec![0, 1]);
    }

    #[test]
    fn non_blocking_fields_always_use_the_fallback() {
        let b = Dataset::from_rows(vec![Row::new().with("city", "Paris")]);
        let mapping = FieldMapping::new().with("city", "city");
        let index = BlockingIndex::build(&b, &fields(&mapping), 2000);
        assert_eq!(index.bucket_count(), 0);
        let a = Dataset::from_rows(vec![Row::new().with("city", "Paris")]);
        assert_eq!(index.pairs(&a).collect::<Vec<_>>(), vec![(0, 0)]);
    }
}
