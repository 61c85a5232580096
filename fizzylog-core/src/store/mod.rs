//! Durable rollup storage.
//!
//! One SQLite table keyed by `(bucket_start_utc, path, status)`. The ingester
//! owns the only writer connection; every query call opens its own read-only
//! connection. WAL journaling (file target) or memdb locking (memory target)
//! plus a busy timeout keeps readers and the writer from blocking each other
//! for longer than that timeout.

mod error;
mod rollup;
mod schema;
mod target;

#[cfg(test)]
mod tests;

pub use error::StoreError;
pub use rollup::{RollupCount, RollupStore};
pub use schema::SCHEMA_SQL;
pub use target::StorageTarget;
