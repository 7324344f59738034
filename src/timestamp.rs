use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

/// Optional whitespace and an optional opening bracket before the timestamp.
const LEAD: &str = r"^\s*\[?";

static ISO8601_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{LEAD}(\d{{4}}-\d{{2}}-\d{{2}}[T ]\d{{2}}:\d{{2}}:\d{{2}}(?:[.,]\d{{1,9}})?(?:Z|[+-]\d{{2}}:?\d{{2}})?)"
    ))
    .expect("valid ISO 8601 pattern")
});

static SYSLOG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{LEAD}(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+(\d{{1,2}})\s+(\d{{2}}):(\d{{2}}):(\d{{2}})"
    ))
    .expect("valid syslog pattern")
});

/// Parses the timestamp a log line starts with.
///
/// Accepted, optionally wrapped in `[...]`:
/// - ISO 8601 / RFC 3339: `2024-01-15T10:30:45.123Z`, `2024-01-15T10:30:45+0200`
/// - common: `2024-01-15 10:30:45`, `2024-01-15 10:30:45,123`
/// - syslog: `Jan 15 10:30:45` (current year assumed)
///
/// Timestamps that do not start the line are ignored.
pub fn parse_leading_timestamp(line: &str) -> Option<DateTime<Utc>> {
    try_iso8601(line).or_else(|| try_syslog_format(line))
}

fn try_iso8601(line: &str) -> Option<DateTime<Utc>> {
    let caps = ISO8601_RE.captures(line)?;
    // Log4j style millisecond separator
    let timestamp_str = caps.get(1)?.as_str().replacen(',', ".", 1);

    if let Ok(dt) = DateTime::parse_from_rfc3339(&timestamp_str) {
        return Some(dt.with_timezone(&Utc));
    }

    // Offset without colon (e.g. +0200 from journalctl)
    if let Some(tz_pos) = timestamp_str.rfind(['+', '-'])
        && tz_pos > 10
        && !timestamp_str[tz_pos..].contains(':')
        && timestamp_str.len() == tz_pos + 5
    {
        let mut normalized = timestamp_str.clone();
        normalized.insert(tz_pos + 3, ':');
        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];

    formats.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(&timestamp_str, format)
            .ok()
            .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
    })
}

fn try_syslog_format(line: &str) -> Option<DateTime<Utc>> {
    let caps = SYSLOG_RE.captures(line)?;

    let month = caps.get(1)?.as_str();
    let day: u32 = caps.get(2)?.as_str().parse().ok()?;
    let hour: u32 = caps.get(3)?.as_str().parse().ok()?;
    let minute: u32 = caps.get(4)?.as_str().parse().ok()?;
    let second: u32 = caps.get(5)?.as_str().parse().ok()?;

    let year = Utc::now().year();
    let timestamp_str = format!("{year} {month} {day} {hour:02}:{minute:02}:{second:02}");

    NaiveDateTime::parse_from_str(&timestamp_str, "%Y %b %d %H:%M:%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}
