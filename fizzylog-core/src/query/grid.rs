use crate::ingest::bucket_start;

/// Evenly spaced bucket starts that a series is aligned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketGrid {
    start: i64,
    width: i64,
    len: usize,
}

// Never empty: `len` is clamped to at least one bucket.
#[allow(clippy::len_without_is_empty)]
impl BucketGrid {
    pub fn new(start: i64, width: i64, len: usize) -> Self {
        Self {
            start,
            width: width.max(1),
            len: len.max(1),
        }
    }

    /// Grid whose last bucket contains `now_utc`.
    ///
    /// Covers `ceil(lookback / width)` buckets, capped at `max_points`, and
    /// always at least one.
    pub fn ending_at(now_utc: i64, width: i64, lookback: i64, max_points: u64) -> Self {
        let width = width.max(1);
        let end = bucket_start(now_utc, width);

        let requested = (lookback.max(0) as u64).div_ceil(width as u64).max(1);
        let len = requested.min(max_points.max(1)) as usize;

        Self::new(end - (len as i64 - 1) * width, width, len)
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    /// Start of the last bucket.
    pub fn end(&self) -> i64 {
        self.start + (self.len as i64 - 1) * self.width
    }

    pub fn width(&self) -> i64 {
        self.width
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn buckets(&self) -> Vec<i64> {
        (0..self.len as i64)
            .map(|i| self.start + i * self.width)
            .collect()
    }
}
