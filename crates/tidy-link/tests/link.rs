use std::sync::Mutex;

use proptest::prelude::*;
use tidy_link::{CancelToken, LinkError, Linker, link};
use tidy_model::{Dataset, FieldMapping, LinkOptions, MatchBucket, MatchMode, Row};

fn person(name: &str, email: &str) -> Row {
    Row::new().with("name", name).with("email", email)
}

fn name_and_email() -> FieldMapping {
    FieldMapping::new()
        .with("name", "name")
        .with("email", "email")
}

fn customers() -> (Dataset, Dataset) {
    let a = Dataset::from_rows(vec![
        person("John Smith", "js@x.com"),
        person("Maria Garcia", "mg@y.org"),
        person("Zed Quinn", ""),
    ]);
    let b = Dataset::from_rows(vec![
        person("Smith John", "js@x.com"),
        person("Mary Garcia", "maria@y.org"),
    ]);
    (a, b)
}

#[test]
fn reordered_name_with_same_email_is_exact() {
    let a = Dataset::from_rows(vec![person("John Smith", "js@x.com")]);
    let b = Dataset::from_rows(vec![person("Smith John", "js@x.com")]);
    let report = link(
        &a,
        &b,
        &name_and_email(),
        MatchMode::Advanced,
        &LinkOptions::default(),
        None,
        None,
    )
    .unwrap();
    assert_eq!(report.exact.len(), 1);
    let result = &report.exact[0];
    assert_eq!(result.b_index, Some(0));
    assert!(result.similarity > 0.99);
    assert_eq!(result.comp_vector["email"], 1.0);
    assert!(report.possible.is_empty() && report.unmatched.is_empty());
}

#[test]
fn every_row_lands_in_one_bucket() {
    let (a, b) = customers();
    let report = Linker::new(&name_and_email(), MatchMode::Advanced)
        .run(&a, &b)
        .unwrap();
    assert_eq!(report.bucket_of(0), Some(MatchBucket::Exact));
    assert_eq!(report.bucket_of(1), Some(MatchBucket::Possible));
    assert_eq!(report.bucket_of(2), Some(MatchBucket::Unmatched));
    assert_eq!(report.possible[0].b_index, Some(1));
    assert!(report.unmatched[0].row_b.is_none());
    insta::assert_json_snapshot!(report.summary, @r#"
    {
      "rows_a": 3,
      "rows_b": 2,
      "exact": 1,
      "possible": 1,
      "unmatched": 1,
      "candidate_pairs": 4,
      "mode": "advanced",
      "thresholds": {
        "exact": 0.9,
        "possible": 0.75
      }
    }
    "#);
}

#[test]
fn parallel_and_sequential_runs_agree() {
    let (a, b) = customers();
    let mapping = name_and_email();
    let parallel = Linker::new(&mapping, MatchMode::Strict)
        .with_options(LinkOptions::new().with_batch_size(1))
        .run(&a, &b)
        .unwrap();
    let sequential = Linker::new(&mapping, MatchMode::Strict)
        .with_options(LinkOptions::new().with_batch_size(1).with_parallel(false))
        .run(&a, &b)
        .unwrap();
    assert_eq!(parallel, sequential);
}

#[test]
fn missing_mapping_columns_are_skipped() {
    let (a, b) = customers();
    let mapping = name_and_email().with("ghost", "email");
    let report = Linker::new(&mapping, MatchMode::Advanced)
        .run(&a, &b)
        .unwrap();
    assert_eq!(report.summary.exact, 1);
    assert!(
        report
            .exact
            .iter()
            .all(|result| !result.comp_vector.contains_key("ghost"))
    );
}

#[test]
fn no_usable_mapping_leaves_every_row_unmatched() {
    let (a, b) = customers();
    let mapping = FieldMapping::new().with("ghost", "phantom");
    let report = Linker::new(&mapping, MatchMode::Basic).run(&a, &b).unwrap();
    assert_eq!(report.unmatched.len(), 3);
    assert_eq!(report.summary.candidate_pairs, 0);
}

#[test]
fn progress_is_reported_per_batch() {
    let (a, b) = customers();
    let mapping = name_and_email();
    let calls = Mutex::new(Vec::new());
    let progress = |done: usize, total: usize| calls.lock().unwrap().push((done, total));
    Linker::new(&mapping, MatchMode::Advanced)
        .with_options(LinkOptions::new().with_batch_size(1).with_parallel(false))
        .with_progress(&progress)
        .run(&a, &b)
        .unwrap();
    assert_eq!(calls.into_inner().unwrap(), vec![(1, 3), (2, 3), (3, 3)]);
}

#[test]
fn cancelled_before_start_scores_nothing() {
    let (a, b) = customers();
    let token = CancelToken::new();
    token.cancel();
    let err = link(
        &a,
        &b,
        &name_and_email(),
        MatchMode::Advanced,
        &LinkOptions::default(),
        Some(&token),
        None,
    )
    .unwrap_err();
    assert_eq!(
        err,
        LinkError::Cancelled {
            completed_batches: 0,
            total_batches: 1,
        }
    );
}

#[test]
fn cancellation_stops_at_a_batch_boundary() {
    let (a, b) = customers();
    let mapping = name_and_email();
    let token = CancelToken::new();
    let handle = token.clone();
    let cancel_after_first = move |done: usize, _total: usize| {
        if done == 1 {
            handle.cancel();
        }
    };
    let err = Linker::new(&mapping, MatchMode::Advanced)
        .with_options(LinkOptions::new().with_batch_size(1).with_parallel(false))
        .with_cancel(token)
        .with_progress(&cancel_after_first)
        .run(&a, &b)
        .unwrap_err();
    assert_eq!(
        err,
        LinkError::Cancelled {
            completed_batches: 1,
            total_batches: 3,
        }
    );
}

fn names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-d]{0,3}( [a-d]{1,3})?", 0..24)
}

proptest! {
    #[test]
    fn buckets_partition_dataset_a(
        left in names(),
        right in names(),
        batch_size in 1usize..6,
        parallel in any::<bool>(),
    ) {
        let to_dataset = |values: &[String]| {
            Dataset::from_rows(values.iter().map(|v| Row::new().with("name", v.as_str())).collect())
        };
        let (a, b) = (to_dataset(&left), to_dataset(&right));
        let mapping = FieldMapping::new().with("name", "name");
        let options = LinkOptions::new()
            .with_batch_size(batch_size)
            .with_parallel(parallel)
            .with_fallback_cap(5);
        let report = Linker::new(&mapping, MatchMode::Advanced)
            .with_options(options)
            .run(&a, &b)
            .unwrap();

        let mut seen: Vec<usize> = report
            .exact
            .iter()
            .chain(&report.possible)
            .chain(&report.unmatched)
            .map(|result| result.a_index)
            .collect();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..a.row_count()).collect::<Vec<_>>());
        for result in report.exact.iter().chain(&report.possible) {
            prop_assert!(result.b_index.is_some());
            prop_assert!((0.0..=1.0).contains(&result.similarity));
        }
    }
}
