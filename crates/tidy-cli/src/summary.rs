use std::cmp::Ordering;

use anyhow::{Context, Result};
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};
use serde::Serialize;

use tidy_model::{Issue, LinkSummary, Severity};

use crate::types::{CleanResult, LinkResult, ProfileResult};

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{json}");
    Ok(())
}

pub fn print_profile(result: &ProfileResult) {
    println!("File: {}", result.file.display());
    println!("Rows: {}  Columns: {}", result.rows, result.columns);
    println!("Quality score: {}", result.score);
    if result.issues.is_empty() {
        println!("No issues found.");
        return;
    }
    println!();
    println!("Issues:");
    println!("{}", issue_table(&result.issues));
}

pub fn print_clean(result: &CleanResult) {
    let report = &result.report;
    println!("File: {}", result.file.display());
    println!("Operations: {}", result.operations);
    if let Some(path) = &result.output {
        println!("Output: {}", path.display());
    }
    println!("{}", clean_table(result));
    if !report.renames.is_empty() {
        println!();
        println!("Renamed columns:");
        for rename in &report.renames {
            println!("- {} -> {}", rename.old, rename.new);
        }
    }
    if !report.skipped.is_empty() {
        println!();
        println!("No change: {}", report.skipped.join(", "));
    }
    if !report.issues_after.is_empty() {
        println!();
        println!("Remaining issues:");
        println!("{}", issue_table(&report.issues_after));
    }
}

pub fn print_link(result: &LinkResult) {
    println!("A: {}", result.left.display());
    println!("B: {}", result.right.display());
    if let Some(path) = &result.output {
        println!("Report: {}", path.display());
    }
    println!("{}", link_table(&result.report.summary));
}

/// Issues ordered by severity (errors first), then column and kind.
pub fn issue_table(issues: &[Issue]) -> Table {
    let mut ordered: Vec<&Issue> = issues.iter().collect();
    ordered.sort_by(|a, b| {
        let severity = b.severity.cmp(&a.severity);
        if severity != Ordering::Equal {
            return severity;
        }
        a.column.cmp(&b.column).then(a.kind.cmp(&b.kind))
    });
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Column"),
        header_cell("Issue"),
        header_cell("Count"),
        header_cell("Description"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Right);
    for issue in ordered {
        table.add_row(vec![
            severity_cell(issue.severity),
            Cell::new(&issue.column),
            Cell::new(issue.kind.as_str()),
            Cell::new(issue.count).fg(severity_color(issue.severity)),
            Cell::new(&issue.description),
        ]);
    }
    table
}

/// Before/after comparison of a cleaning run.
pub fn clean_table(result: &CleanResult) -> Table {
    let report = &result.report;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Metric"),
        header_cell("Before"),
        header_cell("After"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Quality score"),
        score_cell(report.score_before),
        score_cell(report.score_after).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Issues"),
        Cell::new(report.issues_before.len()),
        count_cell(report.issues_after.len(), Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Columns"),
        dim_cell("-"),
        Cell::new(report.dataset.column_count()),
    ]);
    table.add_row(vec![
        Cell::new("Fixed")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(report.progress.to_string()).add_attribute(Attribute::Bold),
    ]);
    table
}

/// Bucket counts of a matching run.
pub fn link_table(summary: &LinkSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Bucket"),
        header_cell("Rows"),
        header_cell("Threshold"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Exact").fg(Color::Green),
        count_cell(summary.exact, Color::Green),
        Cell::new(format!(">= {:.2}", summary.thresholds.exact)),
    ]);
    table.add_row(vec![
        Cell::new("Possible").fg(Color::Yellow),
        count_cell(summary.possible, Color::Yellow),
        Cell::new(format!(">= {:.2}", summary.thresholds.possible)),
    ]);
    table.add_row(vec![
        Cell::new("Unmatched").fg(Color::DarkGrey),
        count_cell(summary.unmatched, Color::Red),
        dim_cell("-"),
    ]);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.rows_a).add_attribute(Attribute::Bold),
        Cell::new(format!("mode {}", summary.mode)),
    ]);
    table.add_row(vec![
        dim_cell("Candidate pairs"),
        dim_cell(summary.candidate_pairs),
        dim_cell(format!("{} rows in B", summary.rows_b)),
    ]);
    table
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 5 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::UpperBoundary(Width::Fixed(28)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Percentage(55)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
        Severity::Info => Cell::new("INFO").fg(Color::Blue),
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
        Severity::Info => Color::Blue,
    }
}

fn score_cell(score: u8) -> Cell {
    let color = match score {
        90.. => Color::Green,
        70..=89 => Color::Yellow,
        _ => Color::Red,
    };
    Cell::new(score).fg(color)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidy_model::IssueKind;

    #[test]
    fn issue_table_lists_errors_first() {
        let issues = [
            Issue::new(IssueKind::HeaderInconsistency, "Age", 1, Severity::Info, "header"),
            Issue::new(IssueKind::EmptyColumn, "notes", 3, Severity::Error, "empty"),
        ];
        let rendered = issue_table(&issues).to_string();
        let error_at = rendered.find("empty_column").unwrap();
        let info_at = rendered.find("header_inconsistency").unwrap();
        assert!(error_at < info_at);
        assert!(rendered.contains("ERROR"));
    }

    #[test]
    fn link_table_shows_mode_and_thresholds() {
        let summary = LinkSummary {
            rows_a: 3,
            rows_b: 2,
            exact: 1,
            possible: 1,
            unmatched: 1,
            candidate_pairs: 4,
            mode: tidy_model::MatchMode::Strict,
            thresholds: tidy_model::MatchThresholds::for_mode(tidy_model::MatchMode::Strict),
        };
        let rendered = link_table(&summary).to_string();
        assert!(rendered.contains("mode strict"));
        assert!(rendered.contains(">= 0.95"));
        assert!(rendered.contains("Unmatched"));
    }
}
