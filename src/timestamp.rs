//! Normalisation of git date strings into comparable timestamps.
//!
//! `git log --date=iso-local` prints dates such as `2024-03-04 09:00:00 +0100`.
//! Other date modes wrap the same information in slightly different shapes
//! (`T` separator, `Z` suffix, fractional seconds), so the ISO-8601 part is
//! located first and rebuilt as RFC 3339 before parsing. The UTC offset is kept.

use crate::error::{HoursError, Result};
use chrono::{DateTime, FixedOffset};
use regex::Regex;
use std::sync::LazyLock;

/// Example matches: "2024-03-04 09:00:00 +0100", "2024-03-04T09:00:00Z",
/// "2024-03-04T09:00:00.250+01:00"
static ISO8601_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d{4}-\d{2}-\d{2})[ T](\d{2}:\d{2}:\d{2}(?:\.\d+)?)\s*(Z|[+-]\d{2}:?\d{2})",
    )
    .unwrap()
});

pub fn parse_git_date(raw: &str) -> Result<DateTime<FixedOffset>> {
    let caps = ISO8601_REGEX
        .captures(raw)
        .ok_or_else(|| HoursError::MalformedTimestamp(raw.to_string()))?;

    let rfc3339 = format!("{}T{}{}", &caps[1], &caps[2], normalize_offset(&caps[3]));
    DateTime::parse_from_rfc3339(&rfc3339)
        .map_err(|_| HoursError::MalformedTimestamp(raw.to_string()))
}

/// `+0100` -> `+01:00`; `Z` and already-colonised offsets pass through.
fn normalize_offset(offset: &str) -> String {
    if offset == "Z" || offset.contains(':') {
        return offset.to_string();
    }
    let (hours, minutes) = offset.split_at(3);
    format!("{hours}:{minutes}")
}
