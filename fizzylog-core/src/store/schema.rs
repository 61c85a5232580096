/// Connection settings for the writer.
pub(crate) const WRITER_PRAGMAS: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
"#;

pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS rollup_counts (
    bucket_start_utc INTEGER NOT NULL,
    path TEXT NOT NULL,
    status INTEGER NOT NULL,
    count INTEGER NOT NULL,
    PRIMARY KEY (bucket_start_utc, path, status)
);
CREATE INDEX IF NOT EXISTS idx_rollup_time ON rollup_counts (bucket_start_utc);
CREATE INDEX IF NOT EXISTS idx_rollup_path_time ON rollup_counts (path, bucket_start_utc);
"#;

pub(crate) const UPSERT_SQL: &str = r#"
INSERT INTO rollup_counts (bucket_start_utc, path, status, count)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT(bucket_start_utc, path, status)
DO UPDATE SET count = count + excluded.count
"#;

pub(crate) const RETENTION_SQL: &str = "DELETE FROM rollup_counts WHERE bucket_start_utc < ?1";
