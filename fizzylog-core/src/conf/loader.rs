use crate::conf::error::ConfigError;
use crate::conf::types::FizzylogConfig;
use crate::conf::validation::{ValidationReport, validate_config};

use std::fs;
use std::path::Path;

/// Read, parse, normalize and validate a YAML config file.
///
/// Any validation error is fatal. Warnings are logged and otherwise ignored.
pub fn load_config(path: &Path) -> Result<FizzylogConfig, ConfigError> {
    let (config, report) = load_config_with_report(path)?;
    for warning in &report.warnings {
        tracing::warn!(field = %warning.field, "{}", warning.message);
    }
    Ok(config)
}

/// Like [`load_config`], but hands back the report so callers can show
/// warnings themselves.
pub fn load_config_with_report(
    path: &Path,
) -> Result<(FizzylogConfig, ValidationReport), ConfigError> {
    //--------------------------------------------------------------------------
    // Hard fail: IO and parsing
    //--------------------------------------------------------------------------
    let raw = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let config = parse_config_str(&raw).map_err(|e| ConfigError::parse(path, e))?;

    //--------------------------------------------------------------------------
    // Semantic validation (aggregate all errors)
    //--------------------------------------------------------------------------
    let report = validate_config(&config);
    if report.has_errors() {
        return Err(ConfigError::Validation { report });
    }

    Ok((config, report))
}

/// Parse YAML into a normalized, not yet validated, config.
pub fn parse_config_str(raw: &str) -> Result<FizzylogConfig, serde_yaml::Error> {
    let config: FizzylogConfig = serde_yaml::from_str(raw)?;
    Ok(config.normalize())
}
