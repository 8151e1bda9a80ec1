//! Parsing of user-supplied dates from forms and query strings.
//!
//! Browsers submit `<input type="date">` as `YYYY-MM-DD` and
//! `<input type="datetime-local">` as `YYYY-MM-DDTHH:MM`. Both are read as UTC.
//! Full RFC 3339 timestamps are accepted too.

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::types::Timestamp;

/// Accepted `datetime-local` layouts, with and without seconds.
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse a date string into a UTC timestamp.
///
/// Returns `None` for empty, whitespace-only or unrecognised input.
///
/// # Examples
///
/// ```
/// use wanderlust_core::dates::parse_date;
/// assert!(parse_date("2024-01-01").is_some());
/// assert!(parse_date("not a date").is_none());
/// ```
pub fn parse_date(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
