//! `run` command implementation.

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::cli::RunArgs;
use crate::settings;

/// Execute the `run` command
pub async fn run_registry(args: &RunArgs) -> Result<()> {
    let settings = settings::resolve(&args.sinks)?;

    info!(
        sinks = settings.sinks.len(),
        historical = %settings.historical_source,
        "Configuration loaded"
    );

    // No sinks at all is fatal: the error propagates to main and ends the process
    let result = settings::bootstrap(&settings).context("Failed to build sinks")?;

    info!(
        sinks = result.sinks.len(),
        metric = result.metric.is_some(),
        historical = result.historical.is_some(),
        "Sink registry ready"
    );

    if args.dry_run {
        info!("Dry run mode - registry built, exiting");
        print!("{}", result.summary());
        result.stop_all();
        return Ok(());
    }

    info!("Waiting for shutdown signal...");
    shutdown_signal().await;

    warn!("Received shutdown signal, stopping sinks...");
    result.stop_all();

    info!("Sink registry finished");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
