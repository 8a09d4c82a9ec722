//! Subscriber setup for the `tidy` binary.
//!
//! Stage summaries log at `info`, per-column and per-batch detail at
//! `debug`. Row values only reach `trace` events through [`redact_value`],
//! and stay redacted unless `--log-data` is given.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

static LOG_DATA: AtomicBool = AtomicBool::new(false);

pub const REDACTED_VALUE: &str = "[REDACTED]";

const TIDY_TARGETS: &[&str] = &[
    "tidy",
    "tidy_cli",
    "tidy_clean",
    "tidy_common",
    "tidy_ingest",
    "tidy_link",
    "tidy_model",
    "tidy_quality",
];

/// `value` when `--log-data` is on, otherwise [`REDACTED_VALUE`].
pub fn redact_value(value: &str) -> &str {
    if LOG_DATA.load(Ordering::Relaxed) {
        value
    } else {
        REDACTED_VALUE
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level for the workspace crates; dependencies stay at `warn`.
    pub level: LevelFilter,
    /// Defer to `RUST_LOG` when it is set.
    pub use_env_filter: bool,
    pub format: LogFormat,
    pub ansi: bool,
    /// Append to this file instead of stderr.
    pub log_file: Option<PathBuf>,
    pub log_data: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::WARN,
            use_env_filter: true,
            format: LogFormat::Pretty,
            ansi: true,
            log_file: None,
            log_data: false,
        }
    }
}

impl LogConfig {
    pub fn directives(&self) -> String {
        let level = self.level.to_string().to_lowercase();
        std::iter::once("warn".to_string())
            .chain(TIDY_TARGETS.iter().map(|target| format!("{target}={level}")))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn env_filter(&self) -> EnvFilter {
        if self.use_env_filter
            && let Ok(filter) = EnvFilter::try_from_default_env()
        {
            return filter;
        }
        EnvFilter::new(self.directives())
    }

    fn format_layer(&self, writer: BoxMakeWriter) -> Box<dyn Layer<Registry> + Send + Sync> {
        let layer = fmt::layer().with_writer(writer).with_target(false);
        match self.format {
            LogFormat::Json => layer.json().with_span_events(FmtSpan::CLOSE).boxed(),
            LogFormat::Compact => layer.compact().with_ansi(self.ansi).without_time().boxed(),
            LogFormat::Pretty => layer.with_ansi(self.ansi).without_time().boxed(),
        }
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails when the log file cannot be opened for appending.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    let writer = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(io::stderr),
    };
    LOG_DATA.store(config.log_data, Ordering::Relaxed);
    tracing_subscriber::registry()
        .with(config.format_layer(writer))
        .with(config.env_filter())
        .init();
    Ok(())
}
