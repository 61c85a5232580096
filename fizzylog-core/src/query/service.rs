use crate::conf::types::{
    ApiConfig, FizzylogConfig, LogConfig, PathsConfig, StatusFilterConfig, StorageConfig,
    UiConfig, WindowConfig,
};
use crate::ingest::IngestStateReader;
use crate::query::error::QueryError;
use crate::query::grid::BucketGrid;
use crate::query::series::{SeriesPoint, build_series};
use crate::query::status_filter::resolve_status_filter;
use crate::store::{RollupStore, StorageTarget};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesResponse {
    pub bucket_start_utc: Vec<i64>,
    pub series: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub tailing: bool,
    pub last_ingest_utc: Option<i64>,
}

/// Effective configuration, as shown to dashboard clients.
#[derive(Debug, Clone, Serialize)]
pub struct MetaResponse {
    pub log: LogConfig,
    pub api: ApiConfig,
    pub window: WindowConfig,
    pub paths: PathsConfig,
    pub status_filter: StatusFilterConfig,
    pub ui: UiConfig,
    pub storage: StorageConfig,
}

/// Read side of fizzylog, one instance per process.
///
/// Holds no storage connection: each [`QueryService::series_at`] call opens
/// and drops its own read-only handle.
#[derive(Debug, Clone)]
pub struct QueryService {
    config: Arc<FizzylogConfig>,
    target: StorageTarget,
    state: IngestStateReader,
}

impl QueryService {
    pub fn new(config: Arc<FizzylogConfig>, state: IngestStateReader) -> Self {
        let target = config.storage.target();
        Self {
            config,
            target,
            state,
        }
    }

    pub fn series(
        &self,
        status_ranges: Option<&str>,
        status_exact: Option<&str>,
    ) -> Result<SeriesResponse, QueryError> {
        self.series_at(Utc::now().timestamp(), status_ranges, status_exact)
    }

    /// Series over the lookback window ending at the bucket containing
    /// `now_utc`, one entry per included path in configured order.
    pub fn series_at(
        &self,
        now_utc: i64,
        status_ranges: Option<&str>,
        status_exact: Option<&str>,
    ) -> Result<SeriesResponse, QueryError> {
        let filter =
            resolve_status_filter(&self.config.status_filter, status_ranges, status_exact)?;

        let window = &self.config.window;
        let grid = BucketGrid::ending_at(
            now_utc,
            window.bucket_width(),
            window.lookback(),
            self.config.ui.max_points,
        );
        let buckets = grid.buckets();
        let paths = &self.config.paths.include_exact;

        let rows = {
            let store = RollupStore::open_read_only(&self.target)?;
            store.query(paths, &filter, grid.start(), grid.end())?
        };
        tracing::debug!(
            mode = ?filter.mode(),
            rows = rows.len(),
            start = grid.start(),
            end = grid.end(),
            "series query"
        );

        Ok(SeriesResponse {
            series: build_series(&buckets, paths, &rows),
            bucket_start_utc: buckets,
        })
    }

    pub fn health(&self) -> HealthResponse {
        let state = self.state.snapshot();
        HealthResponse {
            ok: true,
            tailing: state.tailing,
            last_ingest_utc: state.last_ingest_utc,
        }
    }

    pub fn meta(&self) -> MetaResponse {
        let cfg = &self.config;
        MetaResponse {
            log: cfg.log.clone(),
            api: cfg.api.clone(),
            window: cfg.window.clone(),
            paths: cfg.paths.clone(),
            status_filter: cfg.status_filter.clone(),
            ui: cfg.ui.clone(),
            storage: cfg.storage.clone(),
        }
    }
}
