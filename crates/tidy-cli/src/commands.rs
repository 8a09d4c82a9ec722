use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, info_span, trace};

use tidy_clean::{CleaningSession, suggest_operations};
use tidy_ingest::{IngestOptions, read_dataset, write_dataset};
use tidy_link::Linker;
use tidy_model::{Dataset, MatchMode};
use tidy_quality::{detect_with, quality_score};

use crate::cli::{CleanArgs, LinkArgs, ProfileArgs};
use crate::config::{TidyConfig, load_operations, parse_mapping};
use crate::logging::redact_value;
use crate::types::{CleanResult, LinkResult, ProfileResult};

pub fn run_profile(args: &ProfileArgs, config: &TidyConfig) -> Result<ProfileResult> {
    let span = info_span!("profile", file = %args.file.display());
    let _guard = span.enter();
    let start = Instant::now();

    let options = IngestOptions::default().with_infer_types(args.infer_types);
    let dataset = load(&args.file, &options)?;
    let issues = detect_with(&dataset, &config.detect);
    let score = quality_score(&dataset, &issues);
    info!(
        issues = issues.len(),
        score,
        duration_ms = start.elapsed().as_millis(),
        "profile complete"
    );
    Ok(ProfileResult {
        file: args.file.clone(),
        rows: dataset.row_count(),
        columns: dataset.column_count(),
        score,
        issues,
    })
}

pub fn run_clean(args: &CleanArgs, config: &TidyConfig) -> Result<CleanResult> {
    let span = info_span!("clean_file", file = %args.file.display());
    let _guard = span.enter();
    let start = Instant::now();

    let dataset = load(&args.file, &IngestOptions::default())?;
    let operations = match &args.ops {
        Some(path) => load_operations(path)?,
        None => {
            let operations = suggest_operations(&detect_with(&dataset, &config.detect));
            debug!(operations = operations.len(), "suggested operations");
            operations
        }
    };
    let report = CleaningSession::new()
        .with_options(config.detect.clone())
        .run(&dataset, &operations);

    if let Some(path) = &args.output {
        write_dataset(&report.dataset, path)
            .with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), rows = report.dataset.row_count(), "wrote cleaned dataset");
    }
    info!(
        score_before = report.score_before,
        score_after = report.score_after,
        fixed = %report.progress,
        duration_ms = start.elapsed().as_millis(),
        "clean complete"
    );
    Ok(CleanResult {
        file: args.file.clone(),
        operations: operations.len(),
        report,
        output: args.output.clone(),
    })
}

pub fn run_link(args: &LinkArgs, config: &TidyConfig) -> Result<LinkResult> {
    let mode = MatchMode::from(args.mode);
    let span = info_span!("link_files", mode = %mode);
    let _guard = span.enter();
    let start = Instant::now();

    let mapping = parse_mapping(&args.map)?;
    let a = load(&args.left, &IngestOptions::default())?;
    let b = load(&args.right, &IngestOptions::default())?;
    let mut options = config.link.clone();
    if args.no_parallel {
        options.parallel = false;
    }

    let bar = progress_bar();
    let progress = |done: usize, total: usize| {
        bar.set_length(total as u64);
        bar.set_position(done as u64);
    };
    let outcome = Linker::new(&mapping, mode)
        .with_options(options)
        .with_progress(&progress)
        .run(&a, &b);
    bar.finish_and_clear();
    let report = outcome.context("link datasets")?;

    for result in &report.exact {
        let row = serde_json::to_string(&result.row_a).unwrap_or_default();
        trace!(
            a_index = result.a_index,
            b_index = ?result.b_index,
            similarity = result.similarity,
            row = redact_value(&row),
            "exact match"
        );
    }
    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&report).context("serialize match report")?;
        std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), "wrote match report");
    }
    info!(
        exact = report.summary.exact,
        possible = report.summary.possible,
        unmatched = report.summary.unmatched,
        duration_ms = start.elapsed().as_millis(),
        "link complete"
    );
    Ok(LinkResult {
        left: args.left.clone(),
        right: args.right.clone(),
        report,
        output: args.output.clone(),
    })
}

fn load(path: &Path, options: &IngestOptions) -> Result<Dataset> {
    let dataset =
        read_dataset(path, options).with_context(|| format!("read {}", path.display()))?;
    debug!(
        path = %path.display(),
        rows = dataset.row_count(),
        columns = dataset.column_count(),
        "loaded dataset"
    );
    Ok(dataset)
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} batches",
    )
    .map(|style| style.progress_chars("#>-"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}
