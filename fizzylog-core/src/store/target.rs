use std::fmt;
use std::path::PathBuf;

/// Where the rollup database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageTarget {
    /// SQLite database file. The parent directory is created on first open.
    File(PathBuf),

    /// Named in-memory database on the `memdb` VFS. It exists while at least
    /// one connection to it is open and uses ordinary file locking, so the
    /// busy timeout applies between connections.
    SharedMemory(String),
}

impl StorageTarget {
    /// SQLite URI or filename for this target.
    pub fn dsn(&self) -> String {
        match self {
            StorageTarget::File(path) => path.display().to_string(),
            StorageTarget::SharedMemory(name) => {
                format!("file:/{}?vfs=memdb", name.trim_start_matches('/'))
            }
        }
    }
}

impl fmt::Display for StorageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dsn())
    }
}
