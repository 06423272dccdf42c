//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "pkt",
    version,
    about = "Packet Studio - personalized PDF packets from a roster CSV",
    long_about = "Inspect roster CSVs, auto-map PDF form fields to recipient data,\n\
                  render personalized messages and package export bundles."
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

    /// Allow recipient values (names, emails) in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Settings file (default: platform config folder).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Folder holding the saved app state (default: platform data folder).
    #[arg(long = "state-dir", value_name = "DIR", global = true)]
    pub state_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show a CSV's headers, their hints and the recipient count.
    Inspect(InspectArgs),

    /// Auto-map PDF form fields to recipient data.
    Map(MapArgs),

    /// Render a message template for every recipient.
    Render(RenderArgs),

    /// Archive a folder as a stored (uncompressed) ZIP.
    Zip(ZipArgs),

    /// Import a CSV into the saved app state.
    Import(InspectArgs),

    /// Clear recipients, mapping and message from the saved app state.
    Reset,

    /// Print the effective settings.
    Config,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Roster CSV file.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,
}

#[derive(Parser)]
pub struct MapArgs {
    /// Roster CSV file whose headers are offered as candidates.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Form field list: one name per line, optionally `<TAB>type`.
    #[arg(long = "fields", value_name = "FILE")]
    pub fields: PathBuf,

    /// JSON mapping to start from and write back to.
    #[arg(long = "mapping", value_name = "JSON")]
    pub mapping: Option<PathBuf>,

    /// Also store the resulting mapping in the saved app state.
    #[arg(long = "save")]
    pub save: bool,
}

#[derive(Parser)]
pub struct RenderArgs {
    /// Roster CSV file.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Message file: optional `Subject: ...` line, blank line, body.
    #[arg(long = "template", value_name = "FILE")]
    pub template: PathBuf,

    /// Packet title for `{{packet_title}}` (default: template file stem).
    #[arg(long = "title")]
    pub title: Option<String>,

    /// Token grammar (overrides settings).
    #[arg(long = "grammar", value_enum)]
    pub grammar: Option<GrammarArg>,

    /// `chrono` format for `{{date}}` (overrides settings).
    #[arg(long = "date-format", value_name = "FORMAT")]
    pub date_format: Option<String>,
}

#[derive(Parser)]
pub struct ZipArgs {
    /// Folder to archive.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Archive to create.
    #[arg(value_name = "OUT")]
    pub out: PathBuf,
}

/// CLI token grammar choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum GrammarArg {
    SnakeCase,
    Extended,
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
