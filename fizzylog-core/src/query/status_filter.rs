use crate::conf::types::{StatusFilterConfig, StatusFilterMode};
use crate::query::error::QueryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four HTTP status decades used as a coarse filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatusClass {
    Success,
    Redirection,
    ClientError,
    ServerError,
}

impl StatusClass {
    pub const ALL: [StatusClass; 4] = [
        StatusClass::Success,
        StatusClass::Redirection,
        StatusClass::ClientError,
        StatusClass::ServerError,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatusClass::Success => "2xx",
            StatusClass::Redirection => "3xx",
            StatusClass::ClientError => "4xx",
            StatusClass::ServerError => "5xx",
        }
    }

    /// Case-sensitive exact match on the decade label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.label() == label)
    }

    /// Inclusive status code bounds of the decade.
    pub fn bounds(self) -> (u16, u16) {
        match self {
            StatusClass::Success => (200, 299),
            StatusClass::Redirection => (300, 399),
            StatusClass::ClientError => (400, 499),
            StatusClass::ServerError => (500, 599),
        }
    }

    pub fn contains(self, status: u16) -> bool {
        let (lower, upper) = self.bounds();
        (lower..=upper).contains(&status)
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for StatusClass {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StatusClass::from_label(&value).ok_or_else(|| format!("invalid status range '{value}'"))
    }
}

impl From<StatusClass> for String {
    fn from(value: StatusClass) -> Self {
        value.label().to_string()
    }
}

/// Resolved status filter. Exactly one of the two sets is active.
///
/// An empty set matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter {
    Exact(Vec<u16>),
    Ranges(Vec<StatusClass>),
}

impl StatusFilter {
    pub fn mode(&self) -> StatusFilterMode {
        match self {
            StatusFilter::Exact(_) => StatusFilterMode::Exact,
            StatusFilter::Ranges(_) => StatusFilterMode::Ranges,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            StatusFilter::Exact(codes) => codes.is_empty(),
            StatusFilter::Ranges(ranges) => ranges.is_empty(),
        }
    }

    pub fn matches(&self, status: u16) -> bool {
        match self {
            StatusFilter::Exact(codes) => codes.contains(&status),
            StatusFilter::Ranges(ranges) => ranges.iter().any(|r| r.contains(status)),
        }
    }
}

/// Split a comma-separated override into trimmed, non-empty tokens.
fn tokens(value: Option<&str>) -> impl Iterator<Item = &str> {
    value
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub fn parse_status_ranges(value: Option<&str>) -> Result<Vec<StatusClass>, QueryError> {
    let mut ranges = Vec::new();
    for token in tokens(value) {
        let class = StatusClass::from_label(token).ok_or_else(|| QueryError::InvalidStatusRange {
            token: token.to_string(),
        })?;
        if !ranges.contains(&class) {
            ranges.push(class);
        }
    }
    Ok(ranges)
}

pub fn parse_status_exact(value: Option<&str>) -> Result<Vec<u16>, QueryError> {
    let mut exact = Vec::new();
    for token in tokens(value) {
        let invalid = || QueryError::InvalidStatusCode {
            token: token.to_string(),
        };
        if !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let code: u16 = token.parse().map_err(|_| invalid())?;
        if !(100..=599).contains(&code) {
            return Err(invalid());
        }
        if !exact.contains(&code) {
            exact.push(code);
        }
    }
    Ok(exact)
}

/// Merge the configured default filter with per-query overrides.
///
/// Precedence: a non-empty exact override, then a non-empty range override,
/// then the configured default. The range override is not even parsed when
/// an exact override is present.
pub fn resolve_status_filter(
    defaults: &StatusFilterConfig,
    status_ranges: Option<&str>,
    status_exact: Option<&str>,
) -> Result<StatusFilter, QueryError> {
    let exact = parse_status_exact(status_exact)?;
    if !exact.is_empty() {
        return Ok(StatusFilter::Exact(exact));
    }

    let ranges = parse_status_ranges(status_ranges)?;
    if !ranges.is_empty() {
        return Ok(StatusFilter::Ranges(ranges));
    }

    Ok(match defaults.default_mode {
        StatusFilterMode::Exact => StatusFilter::Exact(defaults.default_exact.clone()),
        StatusFilterMode::Ranges => StatusFilter::Ranges(defaults.default_ranges.clone()),
    })
}
