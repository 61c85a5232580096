use crate::store::RollupCount;
use serde::Serialize;
use std::collections::HashMap;

/// Counts for one path, positionally aligned to the bucket grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub path: String,
    pub counts: Vec<u64>,
}

/// Expand sparse rollup rows into one zero-filled series per path.
///
/// Series come out in `paths` order. Rows whose bucket is not on the grid or
/// whose path was not requested are ignored; if two rows share a
/// `(bucket, path)` the later one wins.
pub fn build_series(grid: &[i64], paths: &[String], rows: &[RollupCount]) -> Vec<SeriesPoint> {
    let slot: HashMap<i64, usize> = grid
        .iter()
        .enumerate()
        .map(|(i, bucket)| (*bucket, i))
        .collect();

    let mut counts: HashMap<&str, Vec<u64>> = paths
        .iter()
        .map(|path| (path.as_str(), vec![0; grid.len()]))
        .collect();

    for row in rows {
        if let (Some(path_counts), Some(&i)) = (
            counts.get_mut(row.path.as_str()),
            slot.get(&row.bucket_start_utc),
        ) {
            path_counts[i] = row.count;
        }
    }

    paths
        .iter()
        .map(|path| SeriesPoint {
            path: path.clone(),
            counts: counts.get(path.as_str()).cloned().unwrap_or_default(),
        })
        .collect()
}
