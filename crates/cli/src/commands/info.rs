//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use sink_factory::{BuildResult, BuiltSink};
use tracing::info;

use crate::cli::InfoArgs;
use crate::settings;

/// Registry info for JSON output
#[derive(Serialize)]
struct RegistryInfo {
    summary: observability::BootstrapSummary,
    sinks: Vec<SinkInfo>,
}

#[derive(Serialize)]
struct SinkInfo {
    name: String,
    kind: &'static str,
    historical: bool,
    default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    retention: Option<RetentionInfo>,
}

#[derive(Serialize)]
struct RetentionInfo {
    short_store_secs: u64,
    long_store_secs: u64,
    long_store_metrics: Vec<String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!("Building sink registry for inspection");

    let settings = settings::resolve(&args.sinks)?;
    let result = settings::bootstrap(&settings).context("Failed to build sinks")?;

    if args.json {
        let info = build_registry_info(&result);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize registry info")?;
        println!("{}", json);
    } else {
        print_registry_info(&result);
    }

    result.stop_all();
    Ok(())
}

fn build_registry_info(result: &BuildResult) -> RegistryInfo {
    let sinks = result
        .sinks
        .iter()
        .map(|sink| sink_info(sink, result))
        .collect();

    RegistryInfo {
        summary: result.summary(),
        sinks,
    }
}

fn sink_info(sink: &BuiltSink, result: &BuildResult) -> SinkInfo {
    let (kind, default, retention) = match sink {
        BuiltSink::Metric(metric) => {
            let config = metric.config();
            let default = result
                .metric
                .as_ref()
                .is_some_and(|m| std::sync::Arc::ptr_eq(m, metric));
            (
                "metric",
                default,
                Some(RetentionInfo {
                    short_store_secs: config.short_store_duration.as_secs(),
                    long_store_secs: config.long_store_duration.as_secs(),
                    long_store_metrics: config.long_store_metrics.clone(),
                }),
            )
        }
        BuiltSink::External(_) => ("external", false, None),
    };

    SinkInfo {
        name: sink.name().to_string(),
        kind,
        historical: sink.historical().is_some(),
        default,
        retention,
    }
}

fn print_registry_info(result: &BuildResult) {
    let info = build_registry_info(result);

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                    Sink Registry                             ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("📤 Sinks ({})", info.sinks.len());
    for (i, sink) in info.sinks.iter().enumerate() {
        let is_last = i == info.sinks.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let child_prefix = if is_last { "   " } else { "│  " };

        let mut tags = Vec::new();
        if sink.default {
            tags.push("default");
        }
        if sink.historical {
            tags.push("historical");
        }
        let tags = if tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", tags.join(", "))
        };

        println!("   {} {} ({}){}", prefix, sink.name, sink.kind, tags);
        if let Some(ref retention) = sink.retention {
            println!(
                "   {}  └─ retention: short {}s, long {}s {:?}",
                child_prefix,
                retention.short_store_secs,
                retention.long_store_secs,
                retention.long_store_metrics
            );
        }
    }

    println!();
    print!("{}", info.summary);
    println!();
}
