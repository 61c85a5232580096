use crate::conf::validation::ValidationReport;

#[derive(Debug, Clone)]
pub struct RangeConstraint<T> {
    pub min: T,
    pub max: T,
    pub label: &'static str,
    pub units: Option<&'static str>,
}

const TEN_YEARS_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

pub const API_PORT: RangeConstraint<u32> = RangeConstraint {
    min: 1,
    max: 65_535,
    label: "api.port",
    units: None,
};

pub const WINDOW_BUCKET_SECONDS: RangeConstraint<u64> = RangeConstraint {
    min: 1,
    max: TEN_YEARS_SECONDS,
    label: "window.bucket_seconds",
    units: Some("s"),
};

pub const WINDOW_LOOKBACK_SECONDS: RangeConstraint<u64> = RangeConstraint {
    min: 1,
    max: TEN_YEARS_SECONDS,
    label: "window.lookback_seconds",
    units: Some("s"),
};

pub const INGEST_FLUSH_SECONDS: RangeConstraint<u64> = RangeConstraint {
    min: 1,
    max: 24 * 60 * 60,
    label: "ingest.flush_seconds",
    units: Some("s"),
};

pub const STORAGE_RETENTION_SECONDS: RangeConstraint<u64> = RangeConstraint {
    min: 1,
    max: TEN_YEARS_SECONDS,
    label: "storage.retention_seconds",
    units: Some("s"),
};

pub const UI_MAX_POINTS: RangeConstraint<u64> = RangeConstraint {
    min: 1,
    max: 100_000,
    label: "ui.max_points",
    units: None,
};

pub const UI_REFRESH_SECONDS: RangeConstraint<u64> = RangeConstraint {
    min: 1,
    max: 60 * 60,
    label: "ui.refresh_seconds",
    units: Some("s"),
};

pub const HTTP_STATUS_CODE: RangeConstraint<u16> = RangeConstraint {
    min: 100,
    max: 599,
    label: "status_filter.default_exact",
    units: None,
};

pub fn validate_range<T>(value: T, constraint: &RangeConstraint<T>, report: &mut ValidationReport)
where
    T: PartialOrd + std::fmt::Display,
{
    if value < constraint.min || value > constraint.max {
        let units = constraint.units.unwrap_or("");
        report.error(
            constraint.label,
            format!(
                "invalid value {}{} (must be between {}{} and {}{})",
                value, units, constraint.min, units, constraint.max, units
            ),
            None,
        );
    }
}
