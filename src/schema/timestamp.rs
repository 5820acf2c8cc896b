//! Timestamp format detection and parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Formats tried by detection, most specific first.
///
/// `%.f` also matches a missing fraction, so the first entry covers both
/// `2015-03-01T00:12:00.000+0900` and `2015-03-01T00:12:00+09:00`.
pub const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d",
];

/// Parse `value` with a strftime `format`.
///
/// Formats without an offset are read as UTC; date-only formats land on
/// midnight UTC.
pub fn parse_timestamp(value: &str, format: &str) -> Option<DateTime<Utc>> {
    if format.contains("%z") {
        DateTime::parse_from_str(value, format)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    } else if format.contains("%H") {
        NaiveDateTime::parse_from_str(value, format)
            .ok()
            .map(|dt| dt.and_utc())
    } else {
        NaiveDate::parse_from_str(value, format)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }
}

/// First known format that parses `value`
pub fn detect_timestamp_format(value: &str) -> Option<&'static str> {
    // Cheap prefix check before running chrono over every candidate.
    let bytes = value.as_bytes();
    if bytes.len() < 10 || !bytes[..4].iter().all(u8::is_ascii_digit) || bytes[4] != b'-' {
        return None;
    }

    TIMESTAMP_FORMATS
        .iter()
        .copied()
        .find(|format| parse_timestamp(value, format).is_some())
}
