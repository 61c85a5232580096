use crate::conf::types::FizzylogConfig;
use crate::ingest::bucket::bucket_start;
use crate::ingest::buffer::{AggregationBuffer, NormalizedKey};
use crate::ingest::constants::{DIAGNOSTIC_INTERVAL, SHUTDOWN_GRACE};
use crate::ingest::error::IngestError;
use crate::ingest::normalize::{PathDecision, PathRules};
use crate::ingest::parse::parse_line;
use crate::ingest::state::{IngestStatePublisher, IngestStateReader};
use crate::ingest::tailer::{ReopenReason, TailEvent, TailTiming, Tailer};
use crate::ingest::throttle::LogThrottle;
use crate::store::RollupStore;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Starts the background ingestion thread.
pub struct Ingester;

impl Ingester {
    pub fn start(config: Arc<FizzylogConfig>) -> Result<IngestHandle, IngestError> {
        Self::start_with_timing(config, TailTiming::default())
    }

    /// Like [`Ingester::start`], with explicit tailer sleeps.
    pub fn start_with_timing(
        config: Arc<FizzylogConfig>,
        timing: TailTiming,
    ) -> Result<IngestHandle, IngestError> {
        let target = config.storage.target();
        let store = RollupStore::open(&target)?;
        tracing::info!(
            storage = %target,
            log = %config.log.path.display(),
            "rollup store ready"
        );

        let publisher = IngestStatePublisher::new();
        let state = publisher.reader();
        let stop = Arc::new(AtomicBool::new(false));
        let (done_tx, done_rx) = mpsc::channel::<()>();

        let ingest = IngestLoop::new(&config, store, publisher, timing);
        let thread = thread::Builder::new()
            .name("fizzylog-ingest".to_string())
            .spawn({
                let stop = stop.clone();
                move || {
                    let mut ingest = ingest;
                    ingest.run(&stop);
                    // Final flush happens when the loop is dropped.
                    drop(ingest);
                    let _ = done_tx.send(());
                }
            })
            .map_err(IngestError::Spawn)?;

        Ok(IngestHandle {
            state,
            stop,
            done: done_rx,
            thread: Some(thread),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownStatus {
    /// The loop exited and its final flush completed.
    Stopped,
    /// The loop did not finish within the grace period and was abandoned.
    TimedOut,
    /// The ingestion thread panicked.
    Panicked,
}

/// Owner's handle on a running ingester. Dropping it signals stop without
/// waiting.
pub struct IngestHandle {
    state: IngestStateReader,
    stop: Arc<AtomicBool>,
    done: mpsc::Receiver<()>,
    thread: Option<JoinHandle<()>>,
}

impl IngestHandle {
    pub fn state(&self) -> IngestStateReader {
        self.state.clone()
    }

    /// Signal stop and wait up to the shutdown grace period.
    pub fn stop(&mut self) -> ShutdownStatus {
        self.stop_within(SHUTDOWN_GRACE)
    }

    pub fn stop_within(&mut self, grace: Duration) -> ShutdownStatus {
        self.stop.store(true, Ordering::SeqCst);

        let Some(thread) = self.thread.take() else {
            return ShutdownStatus::Stopped;
        };

        match self.done.recv_timeout(grace) {
            Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => match thread.join() {
                Ok(()) => ShutdownStatus::Stopped,
                Err(_) => {
                    tracing::error!("ingestion thread panicked");
                    ShutdownStatus::Panicked
                }
            },
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::warn!(
                    grace_ms = grace.as_millis() as u64,
                    "ingestion thread did not stop in time"
                );
                ShutdownStatus::TimedOut
            }
        }
    }
}

impl Drop for IngestHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

//-----------------------------------------------------------------------------
// Loop
//-----------------------------------------------------------------------------

struct Throttles {
    parse: LogThrottle,
    file: LogThrottle,
    storage: LogThrottle,
}

/// All ingestion state, owned by the ingestion thread.
struct IngestLoop {
    tailer: Tailer,
    rules: PathRules,
    store: RollupStore,
    buffer: AggregationBuffer,
    state: IngestStatePublisher,
    throttles: Throttles,

    bucket_width: i64,
    flush_every: Duration,
    retention: i64,
    retention_every: Duration,
    next_flush: Instant,
    next_retention: Instant,
}

impl IngestLoop {
    fn new(
        config: &FizzylogConfig,
        store: RollupStore,
        state: IngestStatePublisher,
        timing: TailTiming,
    ) -> Self {
        let now = Instant::now();
        let flush_every = Duration::from_secs(config.ingest.flush_seconds.max(1));
        let retention_every = Duration::from_secs(config.storage.retention_seconds.max(1));

        Self {
            tailer: Tailer::with_timing(&config.log.path, timing),
            rules: PathRules::from_config(&config.paths),
            store,
            buffer: AggregationBuffer::new(),
            state,
            throttles: Throttles {
                parse: LogThrottle::new(DIAGNOSTIC_INTERVAL),
                file: LogThrottle::new(DIAGNOSTIC_INTERVAL),
                storage: LogThrottle::new(DIAGNOSTIC_INTERVAL),
            },
            bucket_width: config.window.bucket_width().max(1),
            flush_every,
            retention: config.storage.retention(),
            retention_every,
            next_flush: now + flush_every,
            next_retention: now + retention_every,
        }
    }

    fn run(&mut self, stop: &AtomicBool) {
        tracing::info!(path = %self.tailer.path().display(), "ingestion started");

        while !stop.load(Ordering::SeqCst) {
            let event = self.tailer.poll();
            self.handle(event);
            self.tick(Instant::now());
        }

        tracing::info!("ingestion stopping");
    }

    fn handle(&mut self, event: TailEvent) {
        match event {
            TailEvent::Opened => {
                tracing::info!(path = %self.tailer.path().display(), "tailing access log");
                self.state.set_tailing(true);
            }
            TailEvent::Line(line) => self.ingest_line(&line),
            TailEvent::Idle => {}
            TailEvent::Reopen(reason) => {
                self.state.set_tailing(false);
                match reason {
                    ReopenReason::Rotated | ReopenReason::Truncated => {
                        tracing::info!(
                            path = %self.tailer.path().display(),
                            reason = reason.as_str(),
                            "access log replaced, reopening"
                        );
                    }
                    ReopenReason::Vanished => {
                        if let Some(suppressed) = self.throttles.file.check() {
                            tracing::warn!(
                                path = %self.tailer.path().display(),
                                suppressed,
                                "access log disappeared"
                            );
                        }
                    }
                }
            }
            TailEvent::Unavailable(e) => {
                self.state.set_tailing(false);
                if let Some(suppressed) = self.throttles.file.check() {
                    tracing::warn!(
                        path = %self.tailer.path().display(),
                        error = %e,
                        suppressed,
                        "access log unavailable, retrying"
                    );
                }
            }
        }
    }

    fn ingest_line(&mut self, line: &str) {
        let Some(event) = parse_line(line) else {
            if let Some(suppressed) = self.throttles.parse.check() {
                tracing::warn!(suppressed, "skipping unparseable access log line");
            }
            return;
        };

        let PathDecision::Include(path) = self.rules.normalize(event.raw_path) else {
            return;
        };

        let bucket = bucket_start(event.event_time_utc, self.bucket_width);
        self.buffer
            .record(NormalizedKey::new(bucket, path, event.status));
        self.state.set_last_ingest(event.event_time_utc);
    }

    fn tick(&mut self, now: Instant) {
        if now >= self.next_flush {
            self.flush();
            self.next_flush = now + self.flush_every;
        }

        if now >= self.next_retention {
            self.sweep();
            self.next_retention = now + self.retention_every;
        }
    }

    /// Apply the buffer; it is cleared only once the write committed.
    fn flush(&mut self) -> bool {
        if self.buffer.is_empty() {
            return true;
        }

        match self.store.apply_increments(&self.buffer) {
            Ok(rows) => {
                tracing::debug!(rows, events = self.buffer.total(), "flushed rollups");
                self.buffer.clear();
                true
            }
            Err(e) => {
                if let Some(suppressed) = self.throttles.storage.check() {
                    tracing::warn!(
                        error = %e,
                        pending = self.buffer.len(),
                        suppressed,
                        "rollup flush failed, keeping buffer"
                    );
                }
                false
            }
        }
    }

    fn sweep(&mut self) {
        let cutoff = Utc::now().timestamp() - self.retention;
        match self.store.apply_retention(cutoff) {
            Ok(deleted) => tracing::debug!(cutoff, deleted, "retention sweep"),
            Err(e) => {
                if let Some(suppressed) = self.throttles.storage.check() {
                    tracing::warn!(error = %e, cutoff, suppressed, "retention sweep failed");
                }
            }
        }
    }
}

impl Drop for IngestLoop {
    fn drop(&mut self) {
        if !self.flush() {
            tracing::error!(
                pending = self.buffer.len(),
                "final flush failed, buffered counts lost"
            );
        }
        self.tailer.close();
        self.state.set_tailing(false);
    }
}
