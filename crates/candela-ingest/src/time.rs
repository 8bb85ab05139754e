//! Timestamp cell parsing.
//!
//! All naive date-times are read as UTC. Numeric cells are epoch seconds,
//! except magnitudes of 10^11 and above, which are taken as milliseconds
//! (10^11 seconds is past the year 5000).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const MILLIS_THRESHOLD: f64 = 1e11;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parses a time cell into a UTC instant truncated to whole seconds.
pub(crate) fn parse_time(cell: &str) -> Option<DateTime<Utc>> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }

    if let Ok(value) = cell.parse::<f64>() {
        return from_epoch(value);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(cell) {
        return DateTime::from_timestamp(dt.timestamp(), 0);
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(cell, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(cell, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .and_then(|naive| DateTime::from_timestamp(naive.and_utc().timestamp(), 0))
}

fn from_epoch(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() {
        return None;
    }
    let secs = if value.abs() >= MILLIS_THRESHOLD {
        (value / 1000.0).floor()
    } else {
        value.floor()
    };
    // f64 -> i64 saturates; out-of-range values are rejected by chrono.
    DateTime::from_timestamp(secs as i64, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_epoch_seconds() {
        let dt = parse_time("1704067200").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(parse_time("1704067200.0").unwrap(), dt);
    }

    #[test]
    fn test_epoch_millis() {
        let dt = parse_time("1704067260000").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 0, 1, 0).unwrap());
    }

    #[test]
    fn test_iso_strings() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap();
        assert_eq!(parse_time("2024-03-05 14:30:00").unwrap(), expected);
        assert_eq!(parse_time("2024-03-05T14:30").unwrap(), expected);
        assert_eq!(parse_time("2024-03-05T14:30:00Z").unwrap(), expected);
        assert_eq!(parse_time("2024-03-05T16:30:00+02:00").unwrap(), expected);
    }

    #[test]
    fn test_date_only() {
        assert_eq!(
            parse_time("2024-03-05").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_garbage() {
        assert!(parse_time("").is_none());
        assert!(parse_time("yesterday").is_none());
        assert!(parse_time("NaN").is_none());
    }
}
