//! Header naming consistency.

use tidy_model::{DetectOptions, Issue, IssueKind, Severity};

use crate::column::ColumnView;

/// Flag names that are not plain lower-case `snake_case`.
pub fn check(column: &ColumnView<'_>, _options: &DetectOptions) -> Vec<Issue> {
    let name = column.name;
    let mut problems = Vec::new();
    if name.trim() != name {
        problems.push("leading or trailing whitespace");
    }
    if name
        .trim()
        .chars()
        .any(|c| !(c.is_ascii_alphanumeric() || c == '_'))
    {
        problems.push("spaces or special characters");
    }
    if name.chars().any(char::is_uppercase) {
        problems.push("upper-case letters");
    }
    if problems.is_empty() {
        return Vec::new();
    }
    vec![Issue::new(
        IssueKind::HeaderInconsistency,
        name,
        1,
        Severity::Info,
        format!("Header '{name}' has {}", problems.join(" and ")),
    )]
}
