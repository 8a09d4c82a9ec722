//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tidy_model::MatchMode;

#[derive(Parser)]
#[command(
    name = "tidy",
    version,
    about = "Profile, clean and link tabular data",
    long_about = "Profile, clean and link tabular data.\n\n\
                  Detects data-quality issues in CSV or JSON datasets, applies\n\
                  column-scoped cleaning operations and matches records across\n\
                  two datasets."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow row values (names, emails, phones) in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// TOML file with `[detect]` and `[link]` settings.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Detect data-quality issues and score a dataset.
    Profile(ProfileArgs),

    /// Apply cleaning operations and report the quality change.
    Clean(CleanArgs),

    /// Match the records of one dataset against another.
    Link(LinkArgs),
}

#[derive(Args)]
pub struct ProfileArgs {
    /// CSV or JSON dataset.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the issues as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,

    /// Infer numeric and boolean CSV columns while reading.
    #[arg(long = "infer-types")]
    pub infer_types: bool,
}

#[derive(Args)]
pub struct CleanArgs {
    /// CSV or JSON dataset.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// JSON or TOML file listing the operations to apply.
    #[arg(
        long = "ops",
        value_name = "FILE",
        conflicts_with = "auto",
        required_unless_present = "auto"
    )]
    pub ops: Option<PathBuf>,

    /// Apply the suggested fix for every detected issue.
    #[arg(long = "auto")]
    pub auto: bool,

    /// Where to write the cleaned dataset (.csv or .json).
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the cleaning report as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct LinkArgs {
    /// Dataset whose rows are classified.
    #[arg(value_name = "A")]
    pub left: PathBuf,

    /// Dataset searched for matches.
    #[arg(value_name = "B")]
    pub right: PathBuf,

    /// Column pair to compare, as `column_in_a=column_in_b`.
    #[arg(long = "map", value_name = "A=B", required = true)]
    pub map: Vec<String>,

    /// Matching mode.
    #[arg(long = "mode", value_enum, default_value = "advanced")]
    pub mode: ModeArg,

    /// Where to write the full match report as JSON.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Score batches on the current thread only.
    #[arg(long = "no-parallel")]
    pub no_parallel: bool,
}

/// CLI matching mode choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Basic,
    Advanced,
    Strict,
}

impl From<ModeArg> for MatchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Basic => Self::Basic,
            ModeArg::Advanced => Self::Advanced,
            ModeArg::Strict => Self::Strict,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
