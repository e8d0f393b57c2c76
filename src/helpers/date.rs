//! Date helper functions

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt::{self, Write};

/// Parse a front-matter date string in the formats Hexo accepts
///
/// Dates without a time component resolve to midnight. Offsets are
/// dropped after parsing; the wall-clock time the author wrote is kept.
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    let offset_formats = ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z"];
    for fmt in offset_formats {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_local());
        }
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Format a date using Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "YYYY-MM-DD") // -> "2024-01-15"
/// ```
///
/// Fails instead of panicking when chrono rejects the converted format.
pub fn format_date(date: &NaiveDateTime, format: &str) -> Result<String, fmt::Error> {
    let chrono_format = moment_to_chrono_format(format);
    let mut out = String::new();
    write!(out, "{}", date.format(&chrono_format))?;
    Ok(out)
}

/// Check that a Moment.js format converts to a format chrono accepts
pub fn validate_date_format(format: &str) -> Result<(), String> {
    let chrono_format = moment_to_chrono_format(format);
    if StrftimeItems::new(&chrono_format).any(|item| matches!(item, Item::Error)) {
        return Err(format!("unsupported date format `{}`", format));
    }
    Ok(())
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest tokens first within each unit so "MM" never eats half of "MMMM"
    let replacements = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DDDD", "%j"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("hh", "%I"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("dddd", "%A"),
        ("ddd", "%a"),
        ("ZZ", "%z"),
        ("SSS", "%3f"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_parse_common_formats() {
        let expected = ymd_hms(2024, 1, 15, 10, 30, 0);
        assert_eq!(parse_date_string("2024-01-15 10:30:00"), Some(expected));
        assert_eq!(parse_date_string("2024/01/15 10:30"), Some(expected));
        assert_eq!(parse_date_string("2024-01-15T10:30:00"), Some(expected));
        assert_eq!(parse_date_string("2024-01-15T10:30:00+08:00"), Some(expected));
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        assert_eq!(
            parse_date_string("2019-03-02"),
            Some(ymd_hms(2019, 3, 2, 0, 0, 0))
        );
    }

    #[test]
    fn test_parse_invalid_dates() {
        assert_eq!(parse_date_string(""), None);
        assert_eq!(parse_date_string("yesterday"), None);
        assert_eq!(parse_date_string("2024-02-30"), None);
        assert_eq!(parse_date_string("2024-13-01 10:00"), None);
    }

    #[test]
    fn test_format_date() {
        let date = ymd_hms(2024, 1, 15, 10, 30, 0);
        assert_eq!(format_date(&date, "YYYY-MM-DD").unwrap(), "2024-01-15");
        assert_eq!(
            format_date(&date, "YYYY/MM/DD HH:mm").unwrap(),
            "2024/01/15 10:30"
        );
    }

    #[test]
    fn test_bad_format_is_an_error() {
        let date = ymd_hms(2024, 1, 15, 10, 30, 0);
        assert!(format_date(&date, "YYYY-MM-DD 100%").is_err());
        assert!(validate_date_format("YYYY-MM-DD 100%").is_err());
        assert!(validate_date_format("YYYY-MM-DD").is_ok());
        assert!(validate_date_format("MMMM D, YYYY").is_ok());
    }

    #[test]
    fn test_moment_to_chrono() {
        assert_eq!(moment_to_chrono_format("YYYY-MM-DD"), "%Y-%m-%d");
        assert_eq!(moment_to_chrono_format("HH:mm:ss"), "%H:%M:%S");
    }
}
