use crate::ingest::{AggregationBuffer, NormalizedKey};
use crate::query::{StatusClass, StatusFilter};
use crate::store::{RollupCount, RollupStore, StorageTarget};
use pretty_assertions::assert_eq;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::{TempDir, tempdir};

fn temp_store() -> (TempDir, StorageTarget, RollupStore) {
    let dir = tempdir().unwrap();
    let target = StorageTarget::File(dir.path().join("rollups.sqlite"));
    let store = RollupStore::open(&target).unwrap();
    (dir, target, store)
}

fn key(bucket: i64, path: &str, status: u16) -> NormalizedKey {
    NormalizedKey::new(bucket, path, status)
}

fn buffer(entries: &[(i64, &str, u16, u64)]) -> AggregationBuffer {
    entries
        .iter()
        .map(|(bucket, path, status, count)| (key(*bucket, path, *status), *count))
        .collect()
}

fn paths(values: &[&str]) -> Vec<String> {
    values.iter().map(|p| p.to_string()).collect()
}

fn stored_count(store: &RollupStore, bucket: i64, path: &str, status: u16) -> Option<i64> {
    store
        .conn
        .query_row(
            "SELECT count FROM rollup_counts WHERE bucket_start_utc = ?1 AND path = ?2 AND status = ?3",
            rusqlite::params![bucket, path, status],
            |row| row.get(0),
        )
        .ok()
}

fn row_count(store: &RollupStore) -> i64 {
    store
        .conn
        .query_row("SELECT COUNT(*) FROM rollup_counts", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn rollups_aggregate_across_flushes() {
    // Arrange
    let (_dir, _target, mut store) = temp_store();
    store
        .apply_increments(&buffer(&[
            (100, "/", 200, 2),
            (100, "/", 404, 1),
            (160, "/", 200, 3),
        ]))
        .unwrap();
    store
        .apply_increments(&buffer(&[(100, "/", 200, 1)]))
        .unwrap();

    // Act
    let rows = store
        .query(
            &paths(&["/"]),
            &StatusFilter::Ranges(vec![StatusClass::Success]),
            100,
            160,
        )
        .unwrap();

    // Assert
    assert_eq!(
        rows,
        vec![RollupCount::new(100, "/", 3), RollupCount::new(160, "/", 3)]
    );
}

#[test]
fn applying_the_same_increments_twice_doubles_counts() {
    let (_dir, _target, mut store) = temp_store();
    let increments = buffer(&[(0, "/", 200, 5), (60, "/about", 301, 2)]);

    store.apply_increments(&increments).unwrap();
    store.apply_increments(&increments).unwrap();

    assert_eq!(stored_count(&store, 0, "/", 200), Some(10));
    assert_eq!(stored_count(&store, 60, "/about", 301), Some(4));
}

#[test]
fn zero_counts_are_never_persisted() {
    let (_dir, _target, mut store) = temp_store();

    let written = store
        .apply_increments(&buffer(&[(0, "/", 200, 0), (0, "/", 201, 1)]))
        .unwrap();

    assert_eq!(written, 1);
    assert_eq!(stored_count(&store, 0, "/", 200), None);
    assert_eq!(row_count(&store), 1);
}

#[test]
fn empty_buffer_is_a_no_op() {
    let (_dir, _target, mut store) = temp_store();

    let written = store.apply_increments(&AggregationBuffer::new()).unwrap();

    assert_eq!(written, 0);
    assert_eq!(row_count(&store), 0);
}

#[test]
fn oversized_count_rolls_back_the_whole_flush() {
    // Arrange
    let (_dir, _target, mut store) = temp_store();
    let mut increments = AggregationBuffer::new();
    increments.add(key(0, "/", 200), 1);
    increments.add(key(0, "/", 500), u64::MAX);

    // Act
    let result = store.apply_increments(&increments);

    // Assert
    assert!(result.is_err());
    assert_eq!(row_count(&store), 0);
}

#[test]
fn exact_filter_matches_listed_codes_only() {
    let (_dir, _target, mut store) = temp_store();
    store
        .apply_increments(&buffer(&[
            (0, "/", 200, 1),
            (0, "/", 204, 2),
            (0, "/", 404, 4),
            (0, "/", 500, 8),
        ]))
        .unwrap();

    let rows = store
        .query(&paths(&["/"]), &StatusFilter::Exact(vec![204, 404]), 0, 0)
        .unwrap();

    assert_eq!(rows, vec![RollupCount::new(0, "/", 6)]);
}

#[test]
fn multiple_ranges_are_combined() {
    let (_dir, _target, mut store) = temp_store();
    store
        .apply_increments(&buffer(&[
            (0, "/", 200, 1),
            (0, "/", 302, 2),
            (0, "/", 404, 4),
            (0, "/", 503, 8),
        ]))
        .unwrap();

    let rows = store
        .query(
            &paths(&["/"]),
            &StatusFilter::Ranges(vec![StatusClass::Success, StatusClass::ServerError]),
            0,
            0,
        )
        .unwrap();

    assert_eq!(rows, vec![RollupCount::new(0, "/", 9)]);
}

#[test]
fn empty_filter_returns_no_rows() {
    let (_dir, _target, mut store) = temp_store();
    store
        .apply_increments(&buffer(&[(0, "/", 200, 1)]))
        .unwrap();

    let exact = store
        .query(&paths(&["/"]), &StatusFilter::Exact(vec![]), 0, 0)
        .unwrap();
    let ranges = store
        .query(&paths(&["/"]), &StatusFilter::Ranges(vec![]), 0, 0)
        .unwrap();

    assert!(exact.is_empty());
    assert!(ranges.is_empty());
}

#[test]
fn query_respects_path_set_and_bucket_range() {
    // Arrange
    let (_dir, _target, mut store) = temp_store();
    store
        .apply_increments(&buffer(&[
            (0, "/", 200, 1),
            (60, "/", 200, 2),
            (60, "/terms", 200, 3),
            (60, "/other", 200, 4),
            (120, "/", 200, 5),
            (180, "/", 200, 6),
        ]))
        .unwrap();

    // Act
    let rows = store
        .query(
            &paths(&["/", "/terms"]),
            &StatusFilter::Ranges(vec![StatusClass::Success]),
            60,
            120,
        )
        .unwrap();

    // Assert
    assert_eq!(
        rows,
        vec![
            RollupCount::new(60, "/", 2),
            RollupCount::new(60, "/terms", 3),
            RollupCount::new(120, "/", 5),
        ]
    );
}

#[test]
fn retention_deletes_only_rows_before_cutoff() {
    // Arrange
    let (_dir, _target, mut store) = temp_store();
    store
        .apply_increments(&buffer(&[
            (0, "/", 200, 1),
            (60, "/", 200, 1),
            (120, "/", 200, 1),
            (180, "/", 200, 1),
        ]))
        .unwrap();

    // Act
    let deleted = store.apply_retention(120).unwrap();

    // Assert
    assert_eq!(deleted, 2);
    assert_eq!(stored_count(&store, 0, "/", 200), None);
    assert_eq!(stored_count(&store, 60, "/", 200), None);
    assert_eq!(stored_count(&store, 120, "/", 200), Some(1));
    assert_eq!(stored_count(&store, 180, "/", 200), Some(1));
}

#[test]
fn read_only_handle_sees_committed_rows() {
    let (_dir, target, mut store) = temp_store();
    store
        .apply_increments(&buffer(&[(0, "/", 200, 7)]))
        .unwrap();

    let reader = RollupStore::open_read_only(&target).unwrap();
    let rows = reader
        .query(
            &paths(&["/"]),
            &StatusFilter::Ranges(vec![StatusClass::Success]),
            0,
            0,
        )
        .unwrap();

    assert_eq!(rows, vec![RollupCount::new(0, "/", 7)]);
}

#[test]
fn read_only_handle_cannot_write() {
    let (_dir, target, _store) = temp_store();

    let mut reader = RollupStore::open_read_only(&target).unwrap();

    assert!(reader.apply_retention(0).is_err());
}

#[test]
fn open_creates_missing_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested/deeper/rollups.sqlite");

    RollupStore::open(&StorageTarget::File(path.clone())).unwrap();

    assert!(path.exists());
}

#[test]
fn shared_memory_store_is_visible_to_other_connections() {
    // Arrange
    let target = StorageTarget::SharedMemory("fizzylog_store_test".to_string());
    let mut writer = RollupStore::open(&target).unwrap();
    writer
        .apply_increments(&buffer(&[(0, "/", 200, 3)]))
        .unwrap();

    // Act
    let reader = RollupStore::open_read_only(&target).unwrap();
    let rows = reader
        .query(&paths(&["/"]), &StatusFilter::Exact(vec![200]), 0, 0)
        .unwrap();

    // Assert
    assert_eq!(rows, vec![RollupCount::new(0, "/", 3)]);
}

#[test]
fn memory_target_uses_memdb_vfs() {
    let target = StorageTarget::SharedMemory("fizzylog".to_string());

    assert_eq!(target.dsn(), "file:/fizzylog?vfs=memdb");
}

#[test]
fn memory_query_waits_for_open_write_transaction() {
    // Arrange
    let target = StorageTarget::SharedMemory("fizzylog_locking_test".to_string());
    let writer = RollupStore::open(&target).unwrap();
    writer
        .conn
        .execute_batch(
            "BEGIN IMMEDIATE; INSERT INTO rollup_counts VALUES (0, '/', 200, 5);",
        )
        .unwrap();
    let committer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        writer.conn.execute_batch("COMMIT").unwrap();
        writer
    });

    // Act
    let started = Instant::now();
    let result = RollupStore::open_read_only(&target)
        .unwrap()
        .query(&paths(&["/"]), &StatusFilter::Exact(vec![200]), 0, 0);
    let elapsed = started.elapsed();
    let _writer = committer.join().unwrap();

    // Assert
    let rows = result.unwrap();
    assert!(elapsed < Duration::from_secs(5), "waited {elapsed:?}");
    assert!(
        rows.is_empty() || rows == vec![RollupCount::new(0, "/", 5)],
        "{rows:?}"
    );
    let after = RollupStore::open_read_only(&target)
        .unwrap()
        .query(&paths(&["/"]), &StatusFilter::Exact(vec![200]), 0, 0)
        .unwrap();
    assert_eq!(after, vec![RollupCount::new(0, "/", 5)]);
}
