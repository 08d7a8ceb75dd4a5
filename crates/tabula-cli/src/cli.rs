//! CLI argument definitions for `tabula`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "tabula",
    version,
    about = "Tabula - apply column transforms and rule sets to CSV datasets",
    long_about = "Apply scripted column operations to CSV datasets with undo support.\n\n\
                  Also profiles columns and checks rule sets against a dataset."
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
    /// Apply an operation script to a CSV file.
    Apply(ApplyArgs),

    /// Show per-column statistics for a CSV file.
    Stats(StatsArgs),

    /// List the supported operation types.
    Operations,

    /// Validate a rule set against a CSV file and preview its outputs.
    Rules(RulesArgs),
}

#[derive(Parser)]
pub struct ApplyArgs {
    /// CSV file to edit.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// JSON file with the operations to apply, in order.
    #[arg(long = "ops", value_name = "JSON")]
    pub ops: PathBuf,

    /// Write the result here instead of printing it to stdout.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Undo this many operations after applying the script.
    #[arg(long = "undo", value_name = "N", default_value_t = 0)]
    pub undo: usize,

    /// JSON editor options (maxHistorySize, keepText, delimiter).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Parser)]
pub struct StatsArgs {
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Keep every cell as text.
    #[arg(long = "keep-text")]
    pub keep_text: bool,

    /// Print statistics as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct RulesArgs {
    /// JSON rule set file.
    #[arg(value_name = "RULESET")]
    pub rule_set: PathBuf,

    /// CSV file to evaluate the rule set against.
    #[arg(long = "csv", value_name = "CSV")]
    pub csv: PathBuf,

    /// Column the outputs are written to (default: the rule set name).
    #[arg(long = "target", value_name = "COLUMN")]
    pub target: Option<String>,
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
