use crate::query::StatusClass;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilterMode {
    #[default]
    Ranges,
    Exact,
}

/// Status filter applied when a query carries no override.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatusFilterConfig {
    #[serde(default)]
    pub default_mode: StatusFilterMode,

    #[serde(default = "default_ranges")]
    pub default_ranges: Vec<StatusClass>,

    #[serde(default)]
    pub default_exact: Vec<u16>,
}

impl Default for StatusFilterConfig {
    fn default() -> Self {
        Self {
            default_mode: StatusFilterMode::default(),
            default_ranges: default_ranges(),
            default_exact: Vec::new(),
        }
    }
}

fn default_ranges() -> Vec<StatusClass> {
    vec![StatusClass::Success, StatusClass::Redirection]
}
