use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_IGNORE_EXTENSIONS: &[&str] = &[
    ".css", ".js", ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico", ".map", ".woff", ".woff2",
    ".ttf", ".eot",
];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Closed allow-list of paths that are counted. Order is preserved in
    /// query responses.
    pub include_exact: Vec<String>,

    /// Exact-match rewrites applied before the allow-list check (one hop).
    #[serde(default = "default_aliases")]
    pub aliases: BTreeMap<String, String>,

    #[serde(default = "default_true")]
    pub strip_query_string: bool,

    #[serde(default = "default_true")]
    pub ignore_static_assets: bool,

    /// Normalized to `.ext` lower-case form by [`normalize_extensions`].
    #[serde(default = "default_ignore_extensions")]
    pub ignore_extensions: Vec<String>,
}

fn default_aliases() -> BTreeMap<String, String> {
    BTreeMap::from([("/index.html".to_string(), "/".to_string())])
}

fn default_true() -> bool {
    true
}

fn default_ignore_extensions() -> Vec<String> {
    DEFAULT_IGNORE_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

/// Trim, lower-case and dot-prefix each extension, dropping blanks and
/// duplicates while keeping first-seen order.
pub fn normalize_extensions(values: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();

    for value in values {
        let value = value.trim().to_lowercase();
        if value.is_empty() {
            continue;
        }

        let value = if value.starts_with('.') {
            value
        } else {
            format!(".{value}")
        };

        if !normalized.contains(&value) {
            normalized.push(value);
        }
    }

    normalized
}
