//! Packet Studio CLI.

use clap::{ColorChoice, Parser};
use pkt_cli::config::load_settings;
use pkt_cli::logging::{LogConfig, LogFormat, init_logging};
use pkt_cli::report::format_error_help;
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    CommandContext, run_config, run_import, run_inspect, run_map, run_render, run_reset, run_zip,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let ctx = CommandContext {
        settings: load_settings(cli.config.as_deref()),
        config_path: cli.config.clone(),
        state_dir: cli.state_dir.clone(),
    };
    let result = match &cli.command {
        Command::Inspect(args) => run_inspect(args),
        Command::Map(args) => run_map(&ctx, args),
        Command::Render(args) => run_render(&ctx, args),
        Command::Zip(args) => run_zip(args),
        Command::Import(args) => run_import(&ctx, args),
        Command::Reset => run_reset(&ctx),
        Command::Config => run_config(&ctx),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            if let Some(help) = format_error_help(&error) {
                eprintln!("\n{help}");
            }
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
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
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
