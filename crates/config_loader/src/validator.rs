//! Settings validation
//!
//! Rules:
//! - every sink descriptor has a non-empty kind
//! - the historical selector, when set, is a well-formed descriptor
//!
//! Unknown kinds and a selector that matches no descriptor are not errors here;
//! the registry reports them at bootstrap.

use contracts::ContractError;

use crate::settings::SinkSettings;
use crate::uri::SinkUri;

/// Validate settings
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(settings: &SinkSettings) -> Result<(), ContractError> {
    validate_sinks(settings)?;
    validate_historical_source(settings)?;
    Ok(())
}

fn validate_sinks(settings: &SinkSettings) -> Result<(), ContractError> {
    for (idx, raw) in settings.sinks.iter().enumerate() {
        if let Err(e) = SinkUri::parse(raw) {
            return Err(ContractError::config_validation(
                format!("sinks[{idx}]"),
                e.to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_historical_source(settings: &SinkSettings) -> Result<(), ContractError> {
    if !settings.has_historical_source() {
        return Ok(());
    }
    SinkUri::parse(&settings.historical_source)
        .map(|_| ())
        .map_err(|e| ContractError::config_validation("historical_source", e.to_string()))
}
