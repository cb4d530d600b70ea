//! Reusable formatting utilities for report output

use chrono::{DateTime, Local, Utc};

/// Local calendar date, `M/D/YYYY` without zero padding.
///
/// Returns "Unknown" when no date is present.
pub fn format_date_local(date: Option<&DateTime<Utc>>) -> String {
    match date {
        Some(dt) => dt.with_timezone(&Local).format("%-m/%-d/%Y").to_string(),
        None => "Unknown".to_string(),
    }
}

/// RFC 3339 timestamp with milliseconds, or `None`.
pub fn format_iso(date: Option<&DateTime<Utc>>) -> Option<String> {
    date.map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
}

/// `Yes` / `No`
pub fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_date_local_none() {
        assert_eq!(format_date_local(None), "Unknown");
    }

    #[test]
    fn test_format_date_local_valid() {
        // Midday UTC stays on the same date in every timezone within ±11h
        let dt = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(format_date_local(Some(&dt)), "1/15/2025");
    }

    #[test]
    fn test_format_date_local_two_digit_month() {
        let dt = Utc.with_ymd_and_hms(2024, 11, 3, 12, 0, 0).unwrap();
        assert_eq!(format_date_local(Some(&dt)), "11/3/2024");
    }

    #[test]
    fn test_format_iso() {
        let dt = Utc.with_ymd_and_hms(2015, 4, 26, 6, 26, 56).unwrap();
        assert_eq!(format_iso(Some(&dt)).unwrap(), "2015-04-26T06:26:56.000Z");
        assert!(format_iso(None).is_none());
    }

    #[test]
    fn test_yes_no() {
        assert_eq!(yes_no(true), "Yes");
        assert_eq!(yes_no(false), "No");
    }
}
