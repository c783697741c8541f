//! Record validator CLI.

use clap::{ColorChoice, Parser};
use recval_cli::logging::{LogConfig, LogFormat, init_logging, level_from_name};
use recval_model::LoggingConfig;
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg, RunArgs};
use crate::commands::{load_run_config, run, run_validators};
use crate::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let exit_code = match &cli.command {
        Command::Run(args) => run_command(&cli, args),
        Command::Validators => {
            if let Err(error) = init_logging(&log_config_from_cli(&cli, None)) {
                eprintln!("error: failed to initialize logging: {error}");
                std::process::exit(1);
            }
            match run_validators() {
                Ok(()) => 0,
                Err(error) => {
                    eprintln!("error: {error:#}");
                    1
                }
            }
        }
    };
    std::process::exit(exit_code);
}

/// Configuration is loaded before logging exists, so its errors go to stderr
/// directly.
fn run_command(cli: &Cli, args: &RunArgs) -> i32 {
    let config = match load_run_config(args) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("error: {error:#}");
            return 1;
        }
    };
    if let Err(error) = init_logging(&log_config_from_cli(cli, Some(&config.logging))) {
        eprintln!("error: failed to initialize logging: {error}");
        return 1;
    }
    match run(&config, args) {
        Ok(report) => {
            print_summary(&report);
            if report.succeeded() { 0 } else { 1 }
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    }
}

/// Build logging configuration with precedence `--log-level` > `-v/-q` >
/// `logging.nivel`.
fn log_config_from_cli(cli: &Cli, file_config: Option<&LoggingConfig>) -> LogConfig {
    let configured_level = file_config
        .and_then(|logging| logging.level.as_deref())
        .and_then(level_from_name);
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    if !cli.verbosity.is_present()
        && let Some(level) = configured_level
    {
        config.level_filter = level;
    }
    config.use_env_filter =
        !(cli.verbosity.is_present() || cli.log_level.is_some() || configured_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli
        .log_file
        .clone()
        .or_else(|| file_config.and_then(|logging| logging.file.clone()));
    config.with_timestamps = config.log_file.is_some();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => config.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
