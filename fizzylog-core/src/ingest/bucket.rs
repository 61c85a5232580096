/// Floor `event_time_utc` to the start of its bucket.
///
/// `bucket_seconds` must be positive. Negative timestamps floor towards
/// negative infinity, so the result is never after the event.
pub fn bucket_start(event_time_utc: i64, bucket_seconds: i64) -> i64 {
    event_time_utc.div_euclid(bucket_seconds) * bucket_seconds
}
