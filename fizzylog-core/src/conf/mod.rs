mod error;
mod loader;
pub mod types;
pub mod validation;

pub use error::ConfigError;
pub use loader::{load_config, load_config_with_report, parse_config_str};
pub use types::*;
pub use validation::{ValidationIssue, ValidationReport, validate_config};
