//! Lenient parsers for user-entered thresholds and scraped metadata

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse the leading integer of a string.
///
/// Leading whitespace and a single sign are accepted, parsing stops at the
/// first non-digit. Values beyond the `i64` range saturate. Returns `None`
/// when no digit follows.
///
/// ```
/// use fanrelay::filter::parse::parse_leading_int;
///
/// assert_eq!(parse_leading_int("  42abc"), Some(42));
/// assert_eq!(parse_leading_int("-7"), Some(-7));
/// assert_eq!(parse_leading_int("abc"), None);
/// ```
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    let digits = &rest[..digits_end];
    let signed = if negative {
        format!("-{}", digits)
    } else {
        digits.to_string()
    };
    Some(signed.parse().unwrap_or(if negative { i64::MIN } else { i64::MAX }))
}

/// Parse a post date or a date threshold into a UTC timestamp.
///
/// Accepts RFC 3339, naive date-times (taken as UTC) and plain dates
/// (midnight UTC).
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_leading_int_ignores_trailing_text() {
        assert_eq!(parse_leading_int("100"), Some(100));
        assert_eq!(parse_leading_int("12abc"), Some(12));
        assert_eq!(parse_leading_int(" +5 "), Some(5));
    }

    #[test]
    fn test_leading_int_saturates_on_overflow() {
        assert_eq!(parse_leading_int("99999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_leading_int("-99999999999999999999x"), Some(i64::MIN));
        assert_eq!(parse_leading_int("-9223372036854775808"), Some(i64::MIN));
    }

    #[test]
    fn test_leading_int_rejects_non_numeric() {
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("abc123"), None);
    }

    #[test]
    fn test_timestamp_formats() {
        let midnight = Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2020-06-01"), Some(midnight));
        assert_eq!(parse_timestamp("2020-06-01T00:00"), Some(midnight));
        assert_eq!(parse_timestamp("2020-06-01 00:00:00"), Some(midnight));
        assert_eq!(
            parse_timestamp("2020-06-01T09:00:00+09:00"),
            Some(midnight)
        );
    }

    #[test]
    fn test_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2020-13-01"), None);
    }
}
