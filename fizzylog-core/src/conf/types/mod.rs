pub mod paths;
pub mod sections;
pub mod status_filter;
pub mod storage;

pub use paths::*;
pub use sections::*;
pub use status_filter::*;
pub use storage::*;

use serde::{Deserialize, Serialize};

/// Fully parsed fizzylog configuration.
///
/// Constructed once at startup (see [`crate::conf::load_config`]) and shared
/// read-only between the ingester and the query path.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FizzylogConfig {
    pub log: LogConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub window: WindowConfig,

    pub paths: PathsConfig,

    #[serde(default)]
    pub status_filter: StatusFilterConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub ingest: IngestConfig,
}

impl FizzylogConfig {
    /// Canonicalize values that have more than one accepted spelling.
    pub fn normalize(mut self) -> Self {
        self.paths.ignore_extensions = normalize_extensions(&self.paths.ignore_extensions);
        self
    }
}
