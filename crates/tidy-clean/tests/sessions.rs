//! Detect, clean, detect again.

use tidy_clean::{CleaningSession, apply, suggest_operations};
use tidy_model::{CellValue, CleaningOperation, Dataset, IssueKind, OutlierStrategy, Row};
use tidy_quality::detect;

fn kinds_on(dataset: &Dataset, column: &str) -> Vec<IssueKind> {
    detect(dataset)
        .into_iter()
        .filter(|issue| issue.column == column)
        .map(|issue| issue.kind)
        .collect()
}

fn column(name: &str, values: &[&str]) -> Dataset {
    Dataset::from_rows(values.iter().map(|v| Row::new().with(name, *v)).collect())
}

/// Applies the suggested fix for `kind` and checks that detection no longer
/// reports it.
fn assert_resolved(dataset: &Dataset, column: &str, kind: IssueKind) {
    assert!(
        kinds_on(dataset, column).contains(&kind),
        "{kind} not detected before cleaning"
    );
    let cleaned = apply(dataset, &kind.suggested_operation(column)).dataset;
    assert!(
        !kinds_on(&cleaned, column).contains(&kind),
        "{kind} still reported after cleaning"
    );
}

#[test]
fn date_drift_is_resolved() {
    let data = column("signup_date", &["2024-01-05", "01/06/2024", "Jan 7, 2024", "45299"]);
    assert_resolved(&data, "signup_date", IssueKind::DateFormat);
}

#[test]
fn phone_drift_is_resolved() {
    let data = column("phone", &["555-123-4567", "(555) 987-6543", "555.222.3333"]);
    assert_resolved(&data, "phone", IssueKind::PhoneFormat);
}

#[test]
fn invalid_emails_are_resolved_when_repairable() {
    let data = column("email", &["A@X.com", "b..c@y.org", " d@z.net "]);
    assert_resolved(&data, "email", IssueKind::EmailFormat);
}

#[test]
fn duplicates_are_resolved() {
    let data = column("email", &["a@x.com", "A@x.com", "b@x.com"]);
    assert_resolved(&data, "email", IssueKind::Duplicates);
}

#[test]
fn outliers_are_resolved() {
    let data = Dataset::from_rows(
        [10.0, 11.0, 12.0, 13.0, 12.0, 500.0]
            .iter()
            .map(|v| Row::new().with("amount", *v))
            .collect(),
    );
    assert_resolved(&data, "amount", IssueKind::Outliers);
}

#[test]
fn outliers_next_to_currency_text_are_resolved() {
    let mut rows: Vec<Row> = [1.0, 2.0, 3.0, 4.0, 100.0]
        .iter()
        .map(|v| Row::new().with("amount", *v))
        .collect();
    rows.push(Row::new().with("amount", "$50"));
    let data = Dataset::from_rows(rows);
    assert_resolved(&data, "amount", IssueKind::Outliers);

    let capped = apply(
        &data,
        &CleaningOperation::HandleOutliers {
            column: "amount".into(),
            strategy: OutlierStrategy::CapAtThreshold,
            bounds: None,
        },
    )
    .dataset;
    assert_eq!(capped.rows[4].get("amount"), &CellValue::Number(7.0));
    assert_eq!(capped.rows[5].get("amount"), &CellValue::text("$50"));
}

#[test]
fn whitespace_and_encoding_are_resolved() {
    let data = column("city", &[" Paris", "Lyon\u{200B}", "Nice"]);
    assert_resolved(&data, "city", IssueKind::InvisibleWhitespace);
    let data = column("city", &["S\u{c3}\u{a3}o Paulo", "Z\u{fc}rich", "Caf\u{c3}\u{a9}"]);
    assert_resolved(&data, "city", IssueKind::CorruptedEncoding);
}

#[test]
fn category_drift_is_resolved() {
    let data = column("country", &["India", "india", "France", "France"]);
    assert_resolved(&data, "country", IssueKind::CapitalizationInconsistency);
    let data = column("country", &["Germany", "Germny", "France", "Frnace"]);
    assert_resolved(&data, "country", IssueKind::TyposMislabels);
    let data = column("subscribed", &["yes", "y", "no", "n"]);
    assert_resolved(&data, "subscribed", IssueKind::NormalizeCategory);
}

#[test]
fn numeric_strings_are_resolved() {
    let data = column("salary", &["1,200", "3400", "560"]);
    assert_resolved(&data, "salary", IssueKind::ConvertNumericString);
}

#[test]
fn auto_session_improves_the_score() {
    let data = Dataset::from_rows(vec![
        Row::new()
            .with("Customer Email", "A@x.com")
            .with("Notes", "")
            .with("Age", 31.0),
        Row::new()
            .with("Customer Email", "b@x.com")
            .with("Notes", CellValue::Missing)
            .with("Age", 45.0),
        Row::new()
            .with("Customer Email", "c@x.com ")
            .with("Notes", "n/a")
            .with("Age", 52.0),
    ]);
    let operations = suggest_operations(&detect(&data));
    assert_eq!(operations.first().map(CleaningOperation::name), Some("remove_empty_column"));
    assert_eq!(operations.last(), Some(&CleaningOperation::StandardizeHeaders));

    let report = CleaningSession::new().run(&data, &operations);
    assert!(report.score_after > report.score_before);
    assert_eq!(report.dataset.columns, ["age", "customer_email"]);
    assert!(report.issues_after.is_empty(), "{:?}", report.issues_after);
    assert_eq!(report.progress.fixed, report.issues_before.len());
    insta::assert_snapshot!(report.progress, @"4/4");
}
