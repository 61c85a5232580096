use crate::ingest::AggregationBuffer;
use crate::query::StatusFilter;
use crate::store::error::StoreError;
use crate::store::schema::{RETENTION_SQL, SCHEMA_SQL, UPSERT_SQL, WRITER_PRAGMAS};
use crate::store::target::StorageTarget;
use rusqlite::{Connection, OpenFlags, params, params_from_iter, types::Value as SqlValue};
use serde::Serialize;
use std::fs;
use std::time::Duration;

/// Upper bound on how long a statement waits for a competing lock.
const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Summed count for one `(bucket, path)` pair across the matching statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollupCount {
    pub bucket_start_utc: i64,
    pub path: String,
    pub count: u64,
}

impl RollupCount {
    pub fn new(bucket_start_utc: i64, path: impl Into<String>, count: u64) -> Self {
        Self {
            bucket_start_utc,
            path: path.into(),
            count,
        }
    }
}

pub struct RollupStore {
    pub(super) conn: Connection,
}

impl RollupStore {
    /// Open the writer connection, creating the database and schema if needed.
    pub fn open(target: &StorageTarget) -> Result<Self, StoreError> {
        if let StorageTarget::File(path) = target
            && let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(target.dsn()).map_err(|source| StoreError::Open {
            target: target.to_string(),
            source,
        })?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(WRITER_PRAGMAS)?;
        conn.execute_batch(SCHEMA_SQL)?;

        Ok(Self { conn })
    }

    /// Open a read-only connection for a single query.
    ///
    /// The in-memory backend gets a regular connection that this type never
    /// writes through.
    pub fn open_read_only(target: &StorageTarget) -> Result<Self, StoreError> {
        let flags = match target {
            StorageTarget::File(_) => {
                OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX
            }
            StorageTarget::SharedMemory(_) => OpenFlags::default(),
        };

        let conn = Connection::open_with_flags(target.dsn(), flags).map_err(|source| {
            StoreError::Open {
                target: target.to_string(),
                source,
            }
        })?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        Ok(Self { conn })
    }

    /// Add every non-zero buffered count onto the stored rows, in one
    /// transaction. Returns the number of rows touched.
    pub fn apply_increments(&mut self, buffer: &AggregationBuffer) -> Result<usize, StoreError> {
        if buffer.is_empty() {
            return Ok(0);
        }

        let tx = self.conn.transaction()?;
        let mut written = 0;
        {
            let mut stmt = tx.prepare_cached(UPSERT_SQL)?;
            for (key, count) in buffer.iter() {
                if count == 0 {
                    continue;
                }
                let count = i64::try_from(count).map_err(|_| StoreError::CountOverflow { count })?;
                stmt.execute(params![key.bucket_start_utc, key.path, key.status, count])?;
                written += 1;
            }
        }
        tx.commit()?;

        Ok(written)
    }

    /// Summed counts per `(bucket, path)` for buckets in `[start, end]`,
    /// restricted to `paths` and to statuses matching `filter`, ordered by
    /// bucket.
    pub fn query(
        &self,
        paths: &[String],
        filter: &StatusFilter,
        start_bucket_utc: i64,
        end_bucket_utc: i64,
    ) -> Result<Vec<RollupCount>, StoreError> {
        if paths.is_empty() || filter.is_empty() {
            return Ok(Vec::new());
        }

        let mut params: Vec<SqlValue> = vec![
            SqlValue::Integer(start_bucket_utc),
            SqlValue::Integer(end_bucket_utc),
        ];
        params.extend(paths.iter().map(|p| SqlValue::Text(p.clone())));

        let path_placeholders = vec!["?"; paths.len()].join(",");
        let status_clause = status_clause(filter, &mut params);

        let sql = format!(
            "SELECT bucket_start_utc, path, SUM(count) AS count \
             FROM rollup_counts \
             WHERE bucket_start_utc BETWEEN ? AND ? \
             AND path IN ({path_placeholders}) \
             AND ({status_clause}) \
             GROUP BY bucket_start_utc, path \
             ORDER BY bucket_start_utc ASC, path ASC"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                let count: i64 = row.get(2)?;
                Ok(RollupCount {
                    bucket_start_utc: row.get(0)?,
                    path: row.get(1)?,
                    count: count.max(0) as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Delete every row whose bucket starts before `cutoff_utc`. Returns the
    /// number of deleted rows.
    pub fn apply_retention(&mut self, cutoff_utc: i64) -> Result<usize, StoreError> {
        Ok(self.conn.execute(RETENTION_SQL, params![cutoff_utc])?)
    }
}

/// SQL predicate on `status` for a non-empty filter; binds go to `params`.
fn status_clause(filter: &StatusFilter, params: &mut Vec<SqlValue>) -> String {
    match filter {
        StatusFilter::Exact(codes) => {
            params.extend(codes.iter().map(|c| SqlValue::Integer(i64::from(*c))));
            format!("status IN ({})", vec!["?"; codes.len()].join(","))
        }
        StatusFilter::Ranges(ranges) => ranges
            .iter()
            .map(|range| {
                let (lower, upper) = range.bounds();
                params.push(SqlValue::Integer(i64::from(lower)));
                params.push(SqlValue::Integer(i64::from(upper)));
                "(status BETWEEN ? AND ?)"
            })
            .collect::<Vec<_>>()
            .join(" OR "),
    }
}
