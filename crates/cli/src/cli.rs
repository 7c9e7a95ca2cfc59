//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Sink Registry - bootstrap of metrics pipeline output sinks
#[derive(Parser, Debug)]
#[command(
    name = "sink-registry",
    author,
    version,
    about = "Metrics pipeline sink registry",
    long_about = "Builds the output sinks of a metrics pipeline from sink descriptors.\n\n\
                  Guarantees an in-memory metric sink, resolves the optional historical \n\
                  source, and keeps the sinks alive until shutdown."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SINK_REGISTRY_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "SINK_REGISTRY_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the sink registry and keep it running until shutdown
    Run(RunArgs),

    /// Validate sink configuration without building sinks
    Validate(ValidateArgs),

    /// Build the sink registry and display the result
    Info(InfoArgs),
}

/// Sink configuration sources shared by all commands
#[derive(Args, Debug, Clone, Default)]
pub struct SinkArgs {
    /// Path to a settings file (TOML or JSON)
    #[arg(short, long, env = "SINK_REGISTRY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Sink descriptor `KEY[:VALUE]`; repeatable, replaces the file's sinks
    #[arg(long = "sink", env = "SINK_REGISTRY_SINKS", value_delimiter = ',')]
    pub sinks: Vec<String>,

    /// Descriptor of the sink serving historical queries
    #[arg(long, env = "SINK_REGISTRY_HISTORICAL_SOURCE")]
    pub historical_source: Option<String>,
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub sinks: SinkArgs,

    /// Build the registry and exit without waiting for shutdown
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "SINK_REGISTRY_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub sinks: SinkArgs,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    #[command(flatten)]
    pub sinks: SinkArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
