use chrono::{TimeZone, Utc};

/// One combined-format access log line, newline included.
pub fn log_line(event_time_utc: i64, path: &str, status: u16) -> String {
    let time = Utc
        .timestamp_opt(event_time_utc, 0)
        .single()
        .expect("valid timestamp")
        .format("%d/%b/%Y:%H:%M:%S %z");

    format!(
        "192.0.2.10 - - [{time}] \"GET {path} HTTP/1.1\" {status} 512 \"-\" \"integration-test\"\n"
    )
}
