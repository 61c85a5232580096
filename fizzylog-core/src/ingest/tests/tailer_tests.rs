use crate::ingest::{ReopenReason, TailEvent, TailTiming, Tailer, TailerState};
use pretty_assertions::assert_eq;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

fn fast() -> TailTiming {
    TailTiming {
        idle: Duration::ZERO,
        retry: Duration::ZERO,
    }
}

fn append(path: &Path, data: &str) {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .unwrap();
    file.write_all(data.as_bytes()).unwrap();
    file.flush().unwrap();
}

/// Poll until the tailer yields a line or `attempts` polls pass.
fn next_line(tailer: &mut Tailer, attempts: usize) -> Option<String> {
    for _ in 0..attempts {
        if let TailEvent::Line(line) = tailer.poll() {
            return Some(line);
        }
    }
    None
}

fn expect_opened(tailer: &mut Tailer) {
    let event = tailer.poll();
    assert!(matches!(event, TailEvent::Opened), "{event:?}");
    assert_eq!(tailer.state(), TailerState::Tailing);
}

#[test]
fn existing_content_is_skipped() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("access.log");
    append(&path, "old 1\nold 2\n");
    let mut tailer = Tailer::with_timing(&path, fast());

    // Act
    expect_opened(&mut tailer);
    let before = tailer.poll();
    append(&path, "new 1\n");
    let line = next_line(&mut tailer, 5);

    // Assert
    assert!(matches!(before, TailEvent::Idle), "{before:?}");
    assert_eq!(line.as_deref(), Some("new 1"));
}

#[test]
fn lines_are_returned_in_order_without_terminators() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("access.log");
    append(&path, "");
    let mut tailer = Tailer::with_timing(&path, fast());
    expect_opened(&mut tailer);

    // Act
    append(&path, "a\r\nb\nc\n");
    let lines: Vec<_> = (0..3).filter_map(|_| next_line(&mut tailer, 5)).collect();

    // Assert
    assert_eq!(lines, vec!["a", "b", "c"]);
}

#[test]
fn partial_line_is_held_until_complete() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("access.log");
    append(&path, "");
    let mut tailer = Tailer::with_timing(&path, fast());
    expect_opened(&mut tailer);

    // Act
    append(&path, "GET /ab");
    let first = tailer.poll();
    let second = tailer.poll();
    append(&path, "out\n");
    let line = next_line(&mut tailer, 5);

    // Assert
    assert!(matches!(first, TailEvent::Idle), "{first:?}");
    assert!(matches!(second, TailEvent::Idle), "{second:?}");
    assert_eq!(line.as_deref(), Some("GET /about"));
}

#[test]
fn invalid_utf8_is_replaced() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("access.log");
    append(&path, "");
    let mut tailer = Tailer::with_timing(&path, fast());
    expect_opened(&mut tailer);

    // Act
    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(b"a\xffb\n").unwrap();
    let line = next_line(&mut tailer, 5);

    // Assert
    assert_eq!(line.as_deref(), Some("a\u{fffd}b"));
}

#[test]
fn rotation_resumes_on_replacement_without_replay() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("access.log");
    append(&path, "history 1\nhistory 2\nhistory 3\n");
    let mut tailer = Tailer::with_timing(&path, fast());
    expect_opened(&mut tailer);
    append(&path, "before rotation\n");
    assert_eq!(next_line(&mut tailer, 5).as_deref(), Some("before rotation"));

    // Act
    fs::rename(&path, dir.path().join("access.log.1")).unwrap();
    append(&path, "x\n");
    let reopen = tailer.poll();
    let opened = tailer.poll();
    append(&path, "after rotation\n");
    let line = next_line(&mut tailer, 5);

    // Assert
    assert!(
        matches!(reopen, TailEvent::Reopen(ReopenReason::Rotated)),
        "{reopen:?}"
    );
    assert!(matches!(opened, TailEvent::Opened), "{opened:?}");
    assert_eq!(line.as_deref(), Some("after rotation"));
}

#[test]
fn truncation_is_detected() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("access.log");
    append(&path, "0123456789\n0123456789\n");
    let mut tailer = Tailer::with_timing(&path, fast());
    expect_opened(&mut tailer);

    // Act
    fs::write(&path, "short\n").unwrap();
    let reopen = tailer.poll();
    let opened = tailer.poll();
    append(&path, "fresh\n");
    let line = next_line(&mut tailer, 5);

    // Assert
    assert!(
        matches!(reopen, TailEvent::Reopen(ReopenReason::Truncated)),
        "{reopen:?}"
    );
    assert!(matches!(opened, TailEvent::Opened), "{opened:?}");
    assert_eq!(line.as_deref(), Some("fresh"));
}

#[test]
fn removed_file_is_reported_as_vanished() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("access.log");
    append(&path, "");
    let mut tailer = Tailer::with_timing(&path, fast());
    expect_opened(&mut tailer);

    // Act
    fs::remove_file(&path).unwrap();
    let event = tailer.poll();

    // Assert
    assert!(
        matches!(event, TailEvent::Reopen(ReopenReason::Vanished)),
        "{event:?}"
    );
    assert_eq!(tailer.state(), TailerState::Closed);
}

#[test]
fn missing_file_backs_off_then_opens() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("access.log");
    let mut tailer = Tailer::with_timing(&path, fast());

    // Act
    let missing = tailer.poll();
    let state = tailer.state();
    append(&path, "");
    let opened = tailer.poll();

    // Assert
    assert!(matches!(missing, TailEvent::Unavailable(_)), "{missing:?}");
    assert_eq!(state, TailerState::ErrorBackoff);
    assert!(matches!(opened, TailEvent::Opened), "{opened:?}");
}
