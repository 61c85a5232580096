use crate::store::StoreError;
use thiserror::Error;

/// Failures that prevent the ingester from starting.
///
/// Once running, the ingestion loop never fails: file and storage errors are
/// retried in place.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to initialise rollup store: {0}")]
    Store(#[from] StoreError),

    #[error("failed to spawn ingestion thread: {0}")]
    Spawn(#[source] std::io::Error),
}
