use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;

/// `remote ident authuser [DD/Mon/YYYY:HH:MM:SS ±ZZZZ] "request" status size "referer" "user_agent"`
static LOG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?P<remote>\S+) \S+ \S+ \[(?P<time>[^\]]+)\] "(?P<request>[^"]*)" (?P<status>[0-9]{3}) (?P<size>\S+) "(?P<referer>[^"]*)" "(?P<ua>[^"]*)""#,
    )
    .expect("access log pattern must compile")
});

const TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// One successfully parsed access log line. Borrows the path from the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedEvent<'a> {
    pub event_time_utc: i64,
    pub raw_path: &'a str,
    pub status: u16,
}

/// Parse a combined-format access log line.
///
/// Returns `None` unless every part needed downstream is present and valid:
/// the timestamp, a status in `100..=599`, and a request line with at least
/// a method and a path.
pub fn parse_line(line: &str) -> Option<ParsedEvent<'_>> {
    let caps = LOG_PATTERN.captures(line)?;

    let event_time_utc = DateTime::parse_from_str(caps.name("time")?.as_str(), TIME_FORMAT)
        .ok()?
        .timestamp();

    let status: u16 = caps.name("status")?.as_str().parse().ok()?;
    if !(100..=599).contains(&status) {
        return None;
    }

    let request = caps.name("request")?.as_str();
    if request.is_empty() || request == "-" {
        return None;
    }
    let raw_path = request.split_whitespace().nth(1)?;

    Some(ParsedEvent {
        event_time_utc,
        raw_path,
        status,
    })
}
