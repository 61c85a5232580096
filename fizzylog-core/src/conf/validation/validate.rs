use crate::conf::types::{FizzylogConfig, PathsConfig, StatusFilterConfig, StatusFilterMode};
use crate::conf::validation::range::*;
use crate::conf::validation::report::ValidationReport;

/// Validate everything that exists in a fully parsed config.
///
/// Errors and warnings are aggregated so a single run reports every problem.
pub fn validate_config(cfg: &FizzylogConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    if cfg.log.path.as_os_str().is_empty() {
        report.error("log.path", "log path is empty".to_string(), None);
    }

    validate_range(cfg.api.port, &API_PORT, &mut report);
    validate_range(cfg.window.bucket_seconds, &WINDOW_BUCKET_SECONDS, &mut report);
    validate_range(cfg.window.lookback_seconds, &WINDOW_LOOKBACK_SECONDS, &mut report);
    validate_range(cfg.ingest.flush_seconds, &INGEST_FLUSH_SECONDS, &mut report);
    validate_range(cfg.storage.retention_seconds, &STORAGE_RETENTION_SECONDS, &mut report);
    validate_range(cfg.ui.max_points, &UI_MAX_POINTS, &mut report);
    validate_range(cfg.ui.refresh_seconds, &UI_REFRESH_SECONDS, &mut report);

    validate_paths(&cfg.paths, &mut report);
    validate_status_filter(&cfg.status_filter, &mut report);

    if cfg.window.lookback_seconds > cfg.storage.retention_seconds {
        report.warning(
            "window.lookback_seconds",
            format!(
                "lookback window ({}s) is longer than retention ({}s); older buckets will always read as zero",
                cfg.window.lookback_seconds, cfg.storage.retention_seconds
            ),
            Some("Raise storage.retention_seconds or shorten the lookback window.".to_string()),
        );
    }

    if cfg.storage.sqlite_path.as_os_str().is_empty() {
        report.error(
            "storage.sqlite_path",
            "sqlite path is empty".to_string(),
            None,
        );
    }

    report
}

fn validate_paths(paths: &PathsConfig, report: &mut ValidationReport) {
    if paths.include_exact.is_empty() {
        report.error(
            "paths.include_exact",
            "must be a non-empty list".to_string(),
            Some("List every path to count, e.g. include_exact: [\"/\", \"/about\"]".to_string()),
        );
    }

    for path in &paths.include_exact {
        if !path.starts_with('/') {
            report.warning(
                "paths.include_exact",
                format!("'{path}' does not start with '/' and will never match a request path"),
                None,
            );
        }
    }

    for (from, to) in &paths.aliases {
        if !paths.include_exact.contains(to) {
            report.warning(
                "paths.aliases",
                format!("alias '{from}' -> '{to}' targets a path that is not in include_exact"),
                None,
            );
        }
    }
}

fn validate_status_filter(status: &StatusFilterConfig, report: &mut ValidationReport) {
    for code in &status.default_exact {
        validate_range(*code, &HTTP_STATUS_CODE, report);
    }

    match status.default_mode {
        StatusFilterMode::Exact if status.default_exact.is_empty() => report.warning(
            "status_filter.default_exact",
            "default mode is 'exact' but no codes are listed; series will be empty".to_string(),
            None,
        ),
        StatusFilterMode::Ranges if status.default_ranges.is_empty() => report.warning(
            "status_filter.default_ranges",
            "default mode is 'ranges' but no ranges are listed; series will be empty".to_string(),
            None,
        ),
        _ => {}
    }
}
