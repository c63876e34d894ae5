//! `Expires` timestamp parsing and formatting.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

use crate::error::XrdError;

/// Parses an ISO-8601 / RFC 3339 timestamp into UTC.
///
/// Offsets are normalized to UTC. A timestamp without any offset is read as
/// UTC.
pub fn parse_expires(raw: &str) -> Result<DateTime<Utc>, XrdError> {
    let raw = raw.trim();
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Ok(parsed.with_timezone(&Utc)),
        Err(source) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|_| XrdError::InvalidExpires {
                value: raw.to_string(),
                source,
            }),
    }
}

/// Formats a timestamp with the `Z` designator.
///
/// Fractional seconds are written only when present, so
/// `2023-01-01T00:00:00Z` round-trips unchanged.
pub fn format_expires(expires: &DateTime<Utc>) -> String {
    expires.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Fuzz-only entrypoint: parse, format, and parse the formatted text again.
#[cfg(feature = "fuzzing")]
pub fn fuzz_expires_roundtrip(input: &str) -> Result<(), XrdError> {
    let parsed = parse_expires(input)?;
    let reparsed = parse_expires(&format_expires(&parsed))?;
    assert_eq!(parsed, reparsed, "expires changed after a format round trip");
    Ok(())
}
