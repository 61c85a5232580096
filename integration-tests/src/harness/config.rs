use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestBackend {
    Sqlite,
    Memory,
}

/// YAML config pointing the log and database into `dir`.
pub fn render_config(dir: &Path, flush_seconds: u64, backend: TestBackend) -> String {
    let backend = match backend {
        TestBackend::Sqlite => "sqlite",
        TestBackend::Memory => "memory",
    };

    format!(
        r#"
log:
  path: "{log}"
window:
  lookback_seconds: 300
  bucket_seconds: 60
paths:
  include_exact: ["/", "/about", "/pricing"]
  aliases:
    /index.html: /
status_filter:
  default_mode: ranges
  default_ranges: ["2xx", "3xx"]
storage:
  backend: {backend}
  sqlite_path: "{db}"
ingest:
  flush_seconds: {flush_seconds}
"#,
        log = dir.join("access.log").display(),
        db = dir.join("data").join("rollups.sqlite").display(),
    )
}
