use arc_swap::ArcSwap;
use serde::Serialize;
use std::sync::Arc;

/// Liveness of the ingester as seen by health queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IngestState {
    /// A log handle is open and positioned.
    pub tailing: bool,
    /// Event time of the most recently counted line.
    pub last_ingest_utc: Option<i64>,
}

/// Read side of the shared ingest state. Cheap to clone.
#[derive(Debug, Clone)]
pub struct IngestStateReader {
    inner: Arc<ArcSwap<IngestState>>,
}

impl IngestStateReader {
    /// A reader not connected to any ingester; always reports the default.
    pub fn detached() -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(IngestState::default())),
        }
    }

    /// Both fields from the same publication.
    pub fn snapshot(&self) -> IngestState {
        **self.inner.load()
    }
}

/// Write side, owned by the ingestion thread.
///
/// Keeps its own copy of the current state so unchanged values are never
/// republished.
#[derive(Debug)]
pub(crate) struct IngestStatePublisher {
    inner: Arc<ArcSwap<IngestState>>,
    current: IngestState,
}

impl IngestStatePublisher {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(IngestState::default())),
            current: IngestState::default(),
        }
    }

    pub(crate) fn reader(&self) -> IngestStateReader {
        IngestStateReader {
            inner: self.inner.clone(),
        }
    }

    pub(crate) fn set_tailing(&mut self, tailing: bool) {
        if self.current.tailing != tailing {
            self.current.tailing = tailing;
            self.publish();
        }
    }

    pub(crate) fn set_last_ingest(&mut self, event_time_utc: i64) {
        if self.current.last_ingest_utc != Some(event_time_utc) {
            self.current.last_ingest_utc = Some(event_time_utc);
            self.publish();
        }
    }

    fn publish(&self) {
        self.inner.store(Arc::new(self.current));
    }
}
