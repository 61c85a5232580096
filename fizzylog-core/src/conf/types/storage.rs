use crate::store::StorageTarget;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    /// Process-local in-memory database. Contents live as long as the
    /// ingester's writer connection.
    Memory,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: PathBuf,

    /// Rollup rows older than this are deleted by the retention sweep.
    #[serde(default = "default_retention_seconds")]
    pub retention_seconds: u64,
}

impl StorageConfig {
    pub fn target(&self) -> StorageTarget {
        match self.backend {
            StorageBackend::Sqlite => StorageTarget::File(self.sqlite_path.clone()),
            StorageBackend::Memory => StorageTarget::SharedMemory("fizzylog".to_string()),
        }
    }

    pub fn retention(&self) -> i64 {
        self.retention_seconds as i64
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            sqlite_path: default_sqlite_path(),
            retention_seconds: default_retention_seconds(),
        }
    }
}

fn default_sqlite_path() -> PathBuf {
    PathBuf::from("/var/lib/fizzylog/rollups.sqlite")
}

fn default_retention_seconds() -> u64 {
    12 * 60 * 60
}
