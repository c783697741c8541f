//! CLI argument definitions for the record validator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "recval",
    version,
    about = "Validate CSV records and export the valid and invalid sets",
    long_about = "Validate every record of a CSV source against per-field rules.\n\n\
                  Records that pass every rule and records that fail any rule are \
                  written to separate CSV files, and optionally to XML and JSON."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags and `logging.nivel`).
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

    /// Write logs to a file instead of stderr (overrides `logging.archivo`).
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a CSV source and export both partitions.
    Run(RunArgs),

    /// List the available validators and their default field bindings.
    Validators,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Configuration file (TOML).
    #[arg(short, long, value_name = "PATH", default_value = "recval.toml")]
    pub config: PathBuf,

    /// Source CSV file (overrides `archivos.entrada`).
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Directory prepended to every relative output path.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Validate and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Stop exporting after the first failed export.
    #[arg(long = "fail-fast")]
    pub fail_fast: bool,
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
