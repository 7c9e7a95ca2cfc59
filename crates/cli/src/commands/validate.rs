//! `validate` command implementation.

use anyhow::{Context, Result};
use config_loader::{SinkSettings, SinkUri};
use serde::Serialize;
use sink_factory::SinkKind;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::settings;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<SettingsSummary>,
}

#[derive(Serialize)]
struct SettingsSummary {
    sink_count: usize,
    recognized_count: usize,
    #[serde(skip_serializing_if = "String::is_empty")]
    historical_source: String,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!("Validating sink configuration");

    let result = match settings::resolve(&args.sinks) {
        Ok(settings) => validate_settings(&settings),
        Err(e) => ValidationResult {
            valid: false,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    };

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_settings(settings: &SinkSettings) -> ValidationResult {
    let uris = match settings.uris() {
        Ok(uris) => uris,
        Err(e) => {
            return ValidationResult {
                valid: false,
                error: Some(e.to_string()),
                warnings: None,
                summary: None,
            }
        }
    };

    let warnings = collect_warnings(&uris, &settings.historical_source);
    let recognized_count = uris
        .iter()
        .filter(|uri| SinkKind::from_uri(uri).is_ok())
        .count();

    ValidationResult {
        valid: true,
        error: None,
        warnings: if warnings.is_empty() {
            None
        } else {
            Some(warnings)
        },
        summary: Some(SettingsSummary {
            sink_count: uris.len(),
            recognized_count,
            historical_source: settings.historical_source.clone(),
        }),
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(uris: &[SinkUri], historical_source: &str) -> Vec<String> {
    let mut warnings = Vec::new();

    for uri in uris {
        match SinkKind::from_uri(uri) {
            Err(e) => warnings.push(format!("Sink '{}' will be skipped: {}", uri, e)),
            Ok(SinkKind::Metric(_)) => {
                let options = uri.options();
                if !options.is_empty() {
                    let names: Vec<_> = options.into_iter().map(|(k, _)| k).collect();
                    warnings.push(format!("Sink '{}' ignores options: {}", uri, names.join(", ")));
                }
            }
        }
    }

    if !uris.iter().any(|uri| uri.key() == SinkKind::METRIC_KEY) {
        warnings.push("No metric sink configured - a default one will be synthesized".to_string());
    }

    if !historical_source.is_empty() {
        match uris.iter().find(|uri| uri.to_string() == historical_source) {
            None => warnings.push(format!(
                "historical_source '{}' matches no configured sink - historical access will be disabled",
                historical_source
            )),
            Some(uri) => {
                if let Ok(kind) = SinkKind::from_uri(uri) {
                    if !kind.supports_historical() {
                        warnings.push(format!(
                            "Sink type '{}' does not support being used for historical access",
                            uri.key()
                        ));
                    }
                }
            }
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Sink configuration is valid");

        if let Some(ref summary) = result.summary {
            println!("\n  Sinks: {}", summary.sink_count);
            println!("  Recognized: {}", summary.recognized_count);
            if !summary.historical_source.is_empty() {
                println!("  Historical source: {}", summary.historical_source);
            }
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Sink configuration is invalid");
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
