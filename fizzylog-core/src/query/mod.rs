//! Query side of fizzylog.
//!
//! Raw override strings from a caller are resolved against the configured
//! default status filter, the rollup store is read over a bucket grid that
//! ends at the current bucket, and the sparse rows are expanded into dense
//! zero-filled series:
//!
//! status overrides
//! resolve_status_filter
//! StatusFilter
//! RollupStore::query
//! build_series
//! SeriesResponse
//!

mod error;
mod grid;
mod series;
mod service;
mod status_filter;


pub use error::QueryError;
pub use grid::BucketGrid;
pub use series::{SeriesPoint, build_series};
pub use service::{HealthResponse, MetaResponse, QueryService, SeriesResponse};
pub use status_filter::{
    StatusClass, StatusFilter, parse_status_exact, parse_status_ranges, resolve_status_filter,
};
