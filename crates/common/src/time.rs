//! Timestamp formatting used on the wire.

use chrono::{DateTime, SecondsFormat, Utc};

/// Formats a timestamp as RFC3339 with second precision and a `Z` suffix,
/// e.g. `2024-03-01T12:30:00Z`.
pub fn format_rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parses an RFC3339 timestamp into UTC.
pub fn parse_rfc3339(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|ts| ts.with_timezone(&Utc))
}
