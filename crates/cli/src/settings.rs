//! Settings resolution: file first, then CLI/env overrides.

use config_loader::{ConfigLoader, SinkSettings};
use sink_factory::{BuildResult, SinkRegistry};
use tracing::info;

use crate::cli::SinkArgs;
use crate::error::{CliError, Result};

/// Resolve effective sink settings
///
/// `--sink` replaces the file's sinks when given; `--historical-source`
/// replaces the file's selector when given.
pub fn resolve(args: &SinkArgs) -> Result<SinkSettings> {
    let mut settings = match &args.config {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::config_not_found(path.display().to_string()));
            }
            info!(config = %path.display(), "Loading configuration");
            ConfigLoader::load_from_path(path)?
        }
        None => SinkSettings::default(),
    };

    if !args.sinks.is_empty() {
        info!(sinks = args.sinks.len(), "Overriding sinks from CLI");
        settings.sinks = args.sinks.clone();
    }
    if let Some(ref historical) = args.historical_source {
        info!(historical = %historical, "Overriding historical source from CLI");
        settings.historical_source = historical.clone();
    }

    ConfigLoader::validate(&settings)?;
    Ok(settings)
}

/// Build the sink registry from resolved settings
pub fn bootstrap(settings: &SinkSettings) -> Result<BuildResult> {
    let uris = settings.uris()?;
    let result = SinkRegistry::new().build_all(&uris, &settings.historical_source)?;
    Ok(result)
}
