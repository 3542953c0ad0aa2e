//! Timestamp and duration extraction heuristics.
//!
//! Structured creation times use a fixed `YYYY-MM-DDTHH:MM:SS.fff...`
//! layout; only the first three fractional digits are honored. When a
//! record carries no structured time, the concatenated data text is
//! scanned for the first ISO-8601-like substring.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches an integer immediately followed by optional whitespace and "ms"
static DURATION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*ms").expect("valid duration regex"));

/// Matches an ISO-8601-like timestamp with optional fraction and offset
static ISO_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?)(Z|[+-]\d{2}:\d{2})?")
        .expect("valid timestamp regex")
});

/// Parse a structured creation-time string.
///
/// Requires at least 23 characters: the first 19 are parsed as calendar
/// fields, characters 20..23 as milliseconds. Anything else yields `None`
/// rather than an error.
pub fn parse_system_time(time_str: &str) -> Option<f64> {
    if time_str.len() < 23 {
        return None;
    }
    let year: i32 = time_str.get(0..4)?.parse().ok()?;
    let month: u32 = time_str.get(5..7)?.parse().ok()?;
    let day: u32 = time_str.get(8..10)?.parse().ok()?;
    let hour: u32 = time_str.get(11..13)?.parse().ok()?;
    let minute: u32 = time_str.get(14..16)?.parse().ok()?;
    let second: u32 = time_str.get(17..19)?.parse().ok()?;
    let millis: u32 = time_str.get(20..23)?.parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = date.and_hms_milli_opt(hour, minute, second, millis)?;
    Some(time.and_utc().timestamp_millis() as f64 / 1000.0)
}

/// Scan free text for the first ISO-8601-like timestamp.
///
/// Returns the epoch value and the matched substring (kept as the event's
/// display text). A trailing `Z` or explicit offset is honored; otherwise
/// the time is interpreted as UTC.
pub fn scan_iso_timestamp(text: &str) -> Option<(f64, String)> {
    let caps = ISO_PATTERN.captures(text)?;
    let matched = caps.get(0)?.as_str();
    let epoch = if caps.get(2).is_some() {
        DateTime::parse_from_rfc3339(matched)
            .ok()?
            .timestamp_millis() as f64
            / 1000.0
    } else {
        NaiveDateTime::parse_from_str(matched, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()?
            .and_utc()
            .timestamp_millis() as f64
            / 1000.0
    };
    Some((epoch, matched.to_string()))
}

/// Scan free text for the first `<digits> ms` duration token.
///
/// Digits that overflow the capture are non-fatal and yield `None`.
pub fn scan_duration_ms(text: &str) -> Option<f64> {
    let caps = DURATION_PATTERN.captures(text)?;
    caps.get(1)?.as_str().parse::<u64>().ok().map(|v| v as f64)
}

/// Render an epoch value for display ("YYYY-MM-DD HH:MM:SS").
pub fn format_epoch(ts: f64) -> String {
    let secs = ts.floor() as i64;
    let nanos = (((ts - secs as f64) * 1e9).round() as u32).min(999_999_999);
    match DateTime::<Utc>::from_timestamp(secs, nanos) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => ts.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_format_honors_first_three_fraction_digits() {
        let ts = parse_system_time("2025-03-09T07:31:54.1234567").unwrap();
        let millis = ((ts * 1000.0).round() as i64).rem_euclid(1000);
        assert_eq!(millis, 123);
    }

    #[test]
    fn test_short_system_time_is_none() {
        assert_eq!(parse_system_time("2025-03-09T07:31:54"), None);
        assert_eq!(parse_system_time(""), None);
    }

    #[test]
    fn test_garbage_system_time_is_none() {
        assert_eq!(parse_system_time("not-a-time-but-long-enough!!"), None);
    }

    #[test]
    fn test_duration_with_and_without_space() {
        assert_eq!(
            scan_duration_ms("...returns an answer after 342 ms..."),
            Some(342.0)
        );
        assert_eq!(scan_duration_ms("...342ms..."), Some(342.0));
        assert_eq!(scan_duration_ms("no duration here"), None);
    }

    #[test]
    fn test_duration_overflow_is_none() {
        assert_eq!(scan_duration_ms("99999999999999999999999 ms"), None);
    }

    #[test]
    fn test_iso_scan_trailing_z_is_utc() {
        let (with_z, _) = scan_iso_timestamp("at 2025-03-09T07:31:54Z the server").unwrap();
        let (without, _) = scan_iso_timestamp("at 2025-03-09T07:31:54 the server").unwrap();
        assert_eq!(with_z, without);
    }

    #[test]
    fn test_iso_scan_with_offset() {
        let (ts, text) = scan_iso_timestamp("seen 2025-03-09T07:31:54.500+02:00 ok").unwrap();
        assert_eq!(text, "2025-03-09T07:31:54.500+02:00");
        let (utc, _) = scan_iso_timestamp("seen 2025-03-09T05:31:54.500Z ok").unwrap();
        assert_eq!(ts, utc);
    }

    #[test]
    fn test_format_epoch_round_trip() {
        let ts = parse_system_time("2025-03-09T07:31:54.000000").unwrap();
        assert_eq!(format_epoch(ts), "2025-03-09 07:31:54");
    }
}
