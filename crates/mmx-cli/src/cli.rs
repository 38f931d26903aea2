//! CLI argument definitions for the `mmx` tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "mmx",
    version,
    about = "Media-mix variable transformations - apply formula-driven transforms to CSV columns",
    long_about = "Apply lag/lead, adstock, diminishing-returns and log/sqrt/exp transforms\n\
                  to columns of a CSV dataset, written as nested formulas such as\n\
                  log(adstock(lag(tv_spend, 1), 0.5))."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply formulas to a CSV dataset and print the transformed columns.
    Transform(TransformArgs),

    /// Check formulas against a CSV dataset's columns.
    Validate(ValidateArgs),

    /// List example formulas.
    Examples,
}

#[derive(Args)]
pub struct TransformArgs {
    /// CSV file with a header row.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Transformation formula; repeat for several output columns.
    #[arg(short = 'f', long = "formula", required = true)]
    pub formulas: Vec<String>,

    /// Column holding the row dates.
    #[arg(long = "date-column", value_name = "COLUMN")]
    pub date_column: Option<String>,

    /// First day to keep (inclusive). Needs --end to take effect.
    #[arg(long = "start", value_name = "DATE")]
    pub start: Option<String>,

    /// Last day to keep (inclusive). Needs --start to take effect.
    #[arg(long = "end", value_name = "DATE")]
    pub end: Option<String>,

    /// Offset added before taking a logarithm, ln(x + offset).
    #[arg(long = "log-offset", default_value_t = 0.0)]
    pub log_offset: f64,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// CSV file with a header row.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Formula to check; repeat to check several.
    #[arg(short = 'f', long = "formula", required = true)]
    pub formulas: Vec<String>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
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
