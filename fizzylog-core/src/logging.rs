use std::io::{self, IsTerminal};
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable that forces the log output format.
pub const LOG_FORMAT_ENV: &str = "FIZZYLOG_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event, fields flattened.
    Json,
    /// Human-readable, for interactive terminals.
    Pretty,
}

impl LogFormat {
    fn from_env_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "pretty" => Some(LogFormat::Pretty),
            _ => None,
        }
    }
}

/// `FIZZYLOG_LOG_FORMAT` if set to a known value, otherwise pretty on a
/// terminal and JSON everywhere else.
pub fn default_log_format() -> LogFormat {
    if let Some(format) = std::env::var(LOG_FORMAT_ENV)
        .ok()
        .as_deref()
        .and_then(LogFormat::from_env_value)
    {
        return format;
    }

    if io::stdout().is_terminal() {
        LogFormat::Pretty
    } else {
        LogFormat::Json
    }
}

/// Install the global subscriber. Filtering comes from `RUST_LOG` and
/// defaults to `info`.
pub fn init_logging() {
    init_logging_with(default_log_format());
}

pub fn init_logging_with(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => fmt()
            .with_env_filter(filter)
            .json()
            .flatten_event(true)
            .init(),
        LogFormat::Pretty => fmt().with_env_filter(filter).with_target(false).init(),
    }
}
