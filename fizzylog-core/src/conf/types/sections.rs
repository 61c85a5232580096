use serde::{Deserialize, Serialize};
use std::path::PathBuf;

//-----------------------------------------------------------------------------
// log
//-----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// `$remote_addr - $remote_user [$time_local] "$request" $status $body_bytes_sent "$http_referer" "$http_user_agent"`
    #[default]
    NginxCombined,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    /// Access log to tail.
    pub path: PathBuf,

    #[serde(default)]
    pub format: LogFormat,
}

//-----------------------------------------------------------------------------
// api
//-----------------------------------------------------------------------------

/// Settings for the HTTP layer that serves the query interface.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_port")]
    pub port: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: default_api_port(),
        }
    }
}

fn default_api_port() -> u32 {
    8081
}

//-----------------------------------------------------------------------------
// window
//-----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WindowConfig {
    #[serde(default = "default_lookback_seconds")]
    pub lookback_seconds: u64,

    /// Width of one aggregation bucket. Every persisted bucket start is a
    /// multiple of this value.
    #[serde(default = "default_bucket_seconds")]
    pub bucket_seconds: u64,
}

impl WindowConfig {
    pub fn bucket_width(&self) -> i64 {
        self.bucket_seconds as i64
    }

    pub fn lookback(&self) -> i64 {
        self.lookback_seconds as i64
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            lookback_seconds: default_lookback_seconds(),
            bucket_seconds: default_bucket_seconds(),
        }
    }
}

fn default_lookback_seconds() -> u64 {
    6 * 60 * 60
}

fn default_bucket_seconds() -> u64 {
    60
}

//-----------------------------------------------------------------------------
// ui
//-----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeDisplay {
    #[default]
    Local,
    Utc,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    #[serde(default = "default_refresh_seconds")]
    pub refresh_seconds: u64,

    /// Upper bound on the number of buckets returned per series.
    #[serde(default = "default_max_points")]
    pub max_points: u64,

    #[serde(default)]
    pub time_default: TimeDisplay,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_seconds: default_refresh_seconds(),
            max_points: default_max_points(),
            time_default: TimeDisplay::default(),
        }
    }
}

fn default_refresh_seconds() -> u64 {
    2
}

fn default_max_points() -> u64 {
    360
}

//-----------------------------------------------------------------------------
// ingest
//-----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    /// How often buffered counts are written to the rollup store.
    #[serde(default = "default_flush_seconds")]
    pub flush_seconds: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            flush_seconds: default_flush_seconds(),
        }
    }
}

fn default_flush_seconds() -> u64 {
    2
}
