use std::time::Duration;

/// Pause after reading to end-of-file before probing for rotation.
pub const IDLE_SLEEP: Duration = Duration::from_millis(200);
/// Pause after a failed open before retrying.
pub const RETRY_SLEEP: Duration = Duration::from_secs(1);
/// Minimum spacing between repeated diagnostics of one kind.
pub const DIAGNOSTIC_INTERVAL: Duration = Duration::from_secs(5);
/// How long `IngestHandle::stop` waits for the loop to exit.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);
