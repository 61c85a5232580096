use crate::conf::load_config_with_report;
use crate::conf::types::FizzylogConfig;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Load a config for a one-shot command, writing any validation warnings to
/// `warnings`.
///
/// One-shot commands install no subscriber, so warnings are rendered directly
/// instead of going through `tracing`.
pub fn load_config_reporting(path: &Path, warnings: &mut impl Write) -> Result<FizzylogConfig> {
    let (cfg, report) = load_config_with_report(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    if report.has_violations() {
        warnings.write_all(report.render_plain().as_bytes())?;
    }
    Ok(cfg)
}
