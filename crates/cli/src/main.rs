//! # Sink Registry CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - Sink 配置加载与验证
//! - 启动时构建 sink registry
//! - 优雅关闭处理

mod cli;
mod commands;
mod error;
mod settings;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_info, run_registry, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging and the optional metrics endpoint
    observability::init_with_config(observability_config(&cli))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Sink Registry CLI starting"
    );

    // Execute command
    let result = match &cli.command {
        Commands::Run(args) => run_registry(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Observability settings derived from CLI options
fn observability_config(cli: &Cli) -> observability::ObservabilityConfig {
    let default_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let log_format = match cli.log_format {
        cli::LogFormat::Json => observability::LogFormat::Json,
        cli::LogFormat::Pretty => observability::LogFormat::Pretty,
        cli::LogFormat::Compact => observability::LogFormat::Compact,
    };

    // Only `run` serves metrics; 0 disables the endpoint
    let metrics_port = match &cli.command {
        Commands::Run(args) if args.metrics_port != 0 => Some(args.metrics_port),
        _ => None,
    };

    observability::ObservabilityConfig {
        log_format,
        metrics_port,
        default_log_level: default_level.to_string(),
    }
}
