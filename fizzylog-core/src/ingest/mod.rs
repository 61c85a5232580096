//! Ingestion pipeline.
//!
//! A single background thread tails the access log and turns every new line
//! into an increment of a `(bucket, path, status)` counter:
//!
//! Tailer
//! parse_line
//! PathRules::normalize
//! bucket_start
//! AggregationBuffer
//! RollupStore::apply_increments (every flush interval)
//! RollupStore::apply_retention (every retention interval)
//!
//! Everything runs sequentially on that one thread, so the buffer and the
//! file offset need no locking. The only state shared with other threads is
//! [`IngestState`], published as an atomic snapshot.

mod bucket;
mod buffer;
mod constants;
mod error;
mod ingester;
mod normalize;
mod parse;
mod state;
mod tailer;
mod throttle;

#[cfg(test)]
mod tests;

pub use bucket::bucket_start;
pub use buffer::{AggregationBuffer, NormalizedKey};
pub use error::IngestError;
pub use ingester::{IngestHandle, Ingester, ShutdownStatus};
pub use normalize::{ExcludeReason, PathDecision, PathRules};
pub use parse::{ParsedEvent, parse_line};
pub use state::{IngestState, IngestStateReader};
pub use tailer::{FileIdentity, ReopenReason, TailEvent, TailTiming, Tailer, TailerState};
