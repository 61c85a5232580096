use integration_tests::harness::{TestIngest, log_line};
use std::thread;
use std::time::Duration;

const NOW: i64 = 1_760_104_536;

/// A rotated log is followed into its replacement without replaying lines
#[test]
fn rotation_counts_each_line_once() {
    // Arrange
    let ingest = TestIngest::start(1);
    ingest.append_lines(&[log_line(NOW, "/", 200), log_line(NOW, "/", 200)]);
    ingest.wait_for_counts(NOW, "/", &[0, 0, 0, 0, 2]);

    // Act
    ingest.rotate(&log_line(NOW, "/", 200));
    ingest.wait_until_opened(2);
    ingest.append(&log_line(NOW, "/", 200));

    // Assert
    ingest.wait_for_counts(NOW, "/", &[0, 0, 0, 0, 3]);
    thread::sleep(Duration::from_millis(1500));
    assert_eq!(ingest.counts(NOW, "/"), Some(vec![0, 0, 0, 0, 3]));
}

/// A truncated log is reopened and only new data is read
#[test]
fn truncation_is_followed() {
    // Arrange
    let ingest = TestIngest::start(1);
    ingest.append_lines(&[
        log_line(NOW, "/about", 200),
        log_line(NOW, "/about", 200),
        log_line(NOW, "/about", 200),
    ]);
    ingest.wait_for_counts(NOW, "/about", &[0, 0, 0, 0, 3]);

    // Act
    ingest.truncate("x\n");
    ingest.wait_until_opened(2);
    ingest.append(&log_line(NOW, "/about", 200));

    // Assert
    ingest.wait_for_counts(NOW, "/about", &[0, 0, 0, 0, 4]);
}

/// Rotation is reported at info level
#[test]
fn rotation_is_logged() {
    // Arrange
    let ingest = TestIngest::start(1);
    let path = ingest.log_path().display().to_string();

    // Act
    ingest.rotate("");
    ingest.wait_until_opened(2);

    // Assert
    let events = integration_tests::harness::captured_events();
    let events = events.lock().unwrap();
    assert!(events.iter().any(|e| {
        e.message() == Some("access log replaced, reopening")
            && e.field("path") == Some(path.as_str())
            && e.field("reason") == Some("rotated")
    }));
}
