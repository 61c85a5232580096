use crate::ingest::{AggregationBuffer, NormalizedKey, bucket_start};
use pretty_assertions::assert_eq;

#[test]
fn bucket_start_is_aligned_and_not_after_event() {
    for width in [1_i64, 7, 60, 300, 3600] {
        for t in [0_i64, 1, 59, 60, 61, 1_760_104_536, -1, -61] {
            // Act
            let start = bucket_start(t, width);

            // Assert
            assert_eq!(start.rem_euclid(width), 0, "t={t} width={width}");
            assert!(start <= t, "t={t} width={width}");
            assert!(t - start < width, "t={t} width={width}");
        }
    }
}

#[test]
fn bucket_start_examples() {
    assert_eq!(bucket_start(1_760_104_536, 60), 1_760_104_500);
    assert_eq!(bucket_start(120, 60), 120);
    assert_eq!(bucket_start(-1, 60), -60);
}

#[test]
fn record_accumulates_per_key() {
    // Arrange
    let mut buffer = AggregationBuffer::new();

    // Act
    buffer.record(NormalizedKey::new(60, "/", 200));
    buffer.record(NormalizedKey::new(60, "/", 200));
    buffer.record(NormalizedKey::new(60, "/", 404));
    buffer.record(NormalizedKey::new(120, "/", 200));

    // Assert
    assert_eq!(buffer.len(), 3);
    assert_eq!(buffer.total(), 4);
    assert_eq!(buffer.get(&NormalizedKey::new(60, "/", 200)), 2);
    assert_eq!(buffer.get(&NormalizedKey::new(60, "/about", 200)), 0);
}

#[test]
fn clear_empties_buffer() {
    // Arrange
    let mut buffer: AggregationBuffer = [(NormalizedKey::new(0, "/", 200), 5)]
        .into_iter()
        .collect();

    // Act
    buffer.clear();

    // Assert
    assert!(buffer.is_empty());
    assert_eq!(buffer.total(), 0);
}

#[test]
fn add_saturates() {
    // Arrange
    let key = NormalizedKey::new(0, "/", 200);
    let mut buffer = AggregationBuffer::new();

    // Act
    buffer.add(key.clone(), u64::MAX);
    buffer.add(key.clone(), 1);

    // Assert
    assert_eq!(buffer.get(&key), u64::MAX);
}
