use crate::harness::config::{TestBackend, render_config};
use crate::harness::tracing::{captured_events, init_test_tracing};
use fizzylog_core::conf::{FizzylogConfig, parse_config_str, validate_config};
use fizzylog_core::ingest::{IngestHandle, Ingester, ShutdownStatus, TailTiming};
use fizzylog_core::query::{HealthResponse, QueryError, QueryService, SeriesResponse};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const WAIT: Duration = Duration::from_secs(10);
const POLL: Duration = Duration::from_millis(20);

/// A real ingester tailing a log file in a temp directory.
pub struct TestIngest {
    handle: IngestHandle,
    service: QueryService,
    config: Arc<FizzylogConfig>,
    dir: TempDir,
}

impl TestIngest {
    /// Start with an existing, empty log file and wait until it is tailed.
    pub fn start(flush_seconds: u64) -> Self {
        let ingest = Self::start_without_log(flush_seconds, TestBackend::Sqlite);
        ingest.append("");
        ingest.wait_until_opened(1);
        ingest
    }

    /// Start before the log file exists.
    pub fn start_without_log(flush_seconds: u64, backend: TestBackend) -> Self {
        init_test_tracing();

        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let raw = render_config(dir.path(), flush_seconds, backend);
        let config = parse_config_str(&raw).expect("invalid test config");
        let report = validate_config(&config);
        assert!(!report.has_errors(), "invalid test config: {report}");
        let config = Arc::new(config);

        let timing = TailTiming {
            idle: Duration::from_millis(10),
            retry: Duration::from_millis(10),
        };
        let handle =
            Ingester::start_with_timing(config.clone(), timing).expect("failed to start ingester");
        let service = QueryService::new(config.clone(), handle.state());

        Self {
            handle,
            service,
            config,
            dir,
        }
    }

    pub fn config(&self) -> &FizzylogConfig {
        &self.config
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn log_path(&self) -> PathBuf {
        self.config.log.path.clone()
    }

    pub fn append(&self, data: &str) {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_path())
            .expect("failed to open test log");
        file.write_all(data.as_bytes())
            .expect("failed to append to test log");
    }

    pub fn append_lines(&self, lines: &[String]) {
        self.append(&lines.concat());
    }

    /// Replace the log with a new, shorter file. The old file stays behind
    /// as `access.log.1` and the path is never missing.
    pub fn rotate(&self, new_contents: &str) {
        let staged = self.dir().join("access.log.new");
        fs::write(&staged, new_contents).expect("failed to stage new test log");
        fs::hard_link(self.log_path(), self.dir().join("access.log.1"))
            .expect("failed to keep rotated test log");
        fs::rename(&staged, self.log_path()).expect("failed to rotate test log");
    }

    pub fn truncate(&self, new_contents: &str) {
        fs::write(self.log_path(), new_contents).expect("failed to truncate test log");
    }

    /// How often this ingester has opened its log so far.
    pub fn opened_count(&self) -> usize {
        let path = self.log_path().display().to_string();
        captured_events()
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.message() == Some("tailing access log") && e.field("path") == Some(&path))
            .count()
    }

    pub fn wait_until_opened(&self, times: usize) {
        self.wait_for(&format!("log opened {times} times"), |ingest| {
            ingest.opened_count() >= times
        });
    }

    pub fn wait_for(&self, what: &str, ready: impl Fn(&Self) -> bool) {
        let deadline = Instant::now() + WAIT;
        while !ready(self) {
            assert!(Instant::now() < deadline, "timed out waiting for {what}");
            thread::sleep(POLL);
        }
    }

    pub fn series_at(
        &self,
        now_utc: i64,
        status_ranges: Option<&str>,
        status_exact: Option<&str>,
    ) -> Result<SeriesResponse, QueryError> {
        self.service.series_at(now_utc, status_ranges, status_exact)
    }

    /// Counts for `path` under the default filter, or `None` if the query
    /// failed.
    pub fn counts(&self, now_utc: i64, path: &str) -> Option<Vec<u64>> {
        let response = self.series_at(now_utc, None, None).ok()?;
        response
            .series
            .into_iter()
            .find(|s| s.path == path)
            .map(|s| s.counts)
    }

    /// Wait until the flushed counts for `path` equal `expected`.
    pub fn wait_for_counts(&self, now_utc: i64, path: &str, expected: &[u64]) {
        self.wait_for(&format!("{path} counts {expected:?}"), |ingest| {
            ingest.counts(now_utc, path).as_deref() == Some(expected)
        });
    }

    pub fn health(&self) -> HealthResponse {
        self.service.health()
    }

    pub fn stop(&mut self) -> ShutdownStatus {
        self.handle.stop()
    }
}
