use fizzylog_core::ingest::ShutdownStatus;
use integration_tests::harness::{TestIngest, log_line};
use pretty_assertions::assert_eq;
use std::thread;
use std::time::Duration;

const NOW: i64 = 1_760_104_536;

/// Stopping flushes counts that never reached a timer flush
#[test]
fn stop_flushes_pending_counts() {
    // Arrange
    let mut ingest = TestIngest::start(3600);
    ingest.append_lines(&[
        log_line(NOW, "/", 200),
        log_line(NOW, "/pricing", 302),
        log_line(NOW - 60, "/pricing", 200),
    ]);
    ingest.wait_for("all lines read", |i| {
        i.health().last_ingest_utc == Some(NOW - 60)
    });
    thread::sleep(Duration::from_millis(50));
    assert_eq!(ingest.counts(NOW, "/"), Some(vec![0, 0, 0, 0, 0]));

    // Act
    let status = ingest.stop();

    // Assert
    assert_eq!(status, ShutdownStatus::Stopped);
    assert_eq!(ingest.counts(NOW, "/"), Some(vec![0, 0, 0, 0, 1]));
    assert_eq!(ingest.counts(NOW, "/pricing"), Some(vec![0, 0, 0, 1, 1]));
}

/// A second stop is a no-op
#[test]
fn stop_is_idempotent() {
    // Arrange
    let mut ingest = TestIngest::start(1);

    // Act
    let first = ingest.stop();
    let second = ingest.stop();

    // Assert
    assert_eq!(first, ShutdownStatus::Stopped);
    assert_eq!(second, ShutdownStatus::Stopped);
    assert!(!ingest.health().tailing);
}
