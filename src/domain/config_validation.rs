//! Configuration validation.
//!
//! Validates the `[metrics]`, `[source]` and `[report]` sections before any
//! trade file is read.

use crate::domain::error::TradePerfError;
use crate::domain::settings::ReportFormat;
use crate::ports::config_port::ConfigPort;

pub fn validate_settings_config(config: &dyn ConfigPort) -> Result<(), TradePerfError> {
    validate_base_capital(config)?;
    validate_report_format(config)?;
    validate_output(config)?;
    Ok(())
}

pub fn validate_source_config(config: &dyn ConfigPort) -> Result<(), TradePerfError> {
    if config.get_list("source", "paths").is_empty() {
        return Err(TradePerfError::ConfigMissing {
            section: "source".to_string(),
            key: "paths".to_string(),
        });
    }
    Ok(())
}

fn validate_base_capital(config: &dyn ConfigPort) -> Result<(), TradePerfError> {
    let Some(raw) = config.get_string("metrics", "base_capital") else {
        return Ok(());
    };
    let invalid = |reason: &str| TradePerfError::ConfigInvalid {
        section: "metrics".to_string(),
        key: "base_capital".to_string(),
        reason: reason.to_string(),
    };
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid("base_capital must be a number"))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid("base_capital must be positive"));
    }
    Ok(())
}

fn validate_report_format(config: &dyn ConfigPort) -> Result<(), TradePerfError> {
    if let Some(raw) = config.get_string("report", "format") {
        raw.parse::<ReportFormat>()
            .map_err(|reason| TradePerfError::ConfigInvalid {
                section: "report".to_string(),
                key: "format".to_string(),
                reason,
            })?;
    }
    Ok(())
}

fn validate_output(config: &dyn ConfigPort) -> Result<(), TradePerfError> {
    match config.get_string("report", "output") {
        Some(s) if s.trim().is_empty() => Err(TradePerfError::ConfigInvalid {
            section: "report".to_string(),
            key: "output".to_string(),
            reason: "output must not be empty".to_string(),
        }),
        _ => Ok(()),
    }
}
