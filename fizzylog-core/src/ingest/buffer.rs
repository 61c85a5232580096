use std::collections::HashMap;

/// The unit of aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedKey {
    pub bucket_start_utc: i64,
    pub path: String,
    pub status: u16,
}

impl NormalizedKey {
    pub fn new(bucket_start_utc: i64, path: impl Into<String>, status: u16) -> Self {
        Self {
            bucket_start_utc,
            path: path.into(),
            status,
        }
    }
}

/// Counts accumulated between two flushes.
#[derive(Debug, Clone, Default)]
pub struct AggregationBuffer {
    counts: HashMap<NormalizedKey, u64>,
}

impl AggregationBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one event.
    pub fn record(&mut self, key: NormalizedKey) {
        self.add(key, 1);
    }

    pub fn add(&mut self, key: NormalizedKey, count: u64) {
        let entry = self.counts.entry(key).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    pub fn get(&self, key: &NormalizedKey) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NormalizedKey, u64)> {
        self.counts.iter().map(|(key, count)| (key, *count))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().fold(0, |acc, c| acc.saturating_add(*c))
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

impl FromIterator<(NormalizedKey, u64)> for AggregationBuffer {
    fn from_iter<I: IntoIterator<Item = (NormalizedKey, u64)>>(iter: I) -> Self {
        let mut buffer = AggregationBuffer::new();
        for (key, count) in iter {
            buffer.add(key, count);
        }
        buffer
    }
}
