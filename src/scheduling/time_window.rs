//! Date and time-of-day parsing, formatting and comparison

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::{AppError, AppResult};

pub const TIME_FORMAT: &str = "%H:%M";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an `HH:MM` time of day.
///
/// Store columns typed `time` come back as `HH:MM:SS`; those are accepted too
/// and truncated to the minute.
pub fn parse_time(s: &str) -> AppResult<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map(truncate_to_minute)
        .map_err(|_| AppError::Format(format!("Invalid time '{}' (use HH:MM)", s)))
}

/// Render a time of day as zero-padded 24h `HH:MM`
pub fn format_time(t: NaiveTime) -> String {
    t.format(TIME_FORMAT).to_string()
}

pub fn compare(a: NaiveTime, b: NaiveTime) -> Ordering {
    a.cmp(&b)
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| AppError::Format(format!("Invalid date '{}' (use YYYY-MM-DD)", s)))
}

pub fn format_date(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

/// Combine a date string and a time string into a local instant
pub fn combine(date: &str, time: &str) -> AppResult<NaiveDateTime> {
    Ok(parse_date(date)?.and_time(parse_time(time)?))
}

fn truncate_to_minute(t: NaiveTime) -> NaiveTime {
    t.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}

/// Serde helpers rendering an optional `NaiveTime` as `HH:MM` or null
pub mod hhmm_option {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        t: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match t {
            Some(t) => serializer.serialize_str(&super::format_time(*t)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) if !s.trim().is_empty() => super::parse_time(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("08:30").unwrap(), t(8, 30));
        assert_eq!(parse_time("17:05:42").unwrap(), t(17, 5));
        assert!(matches!(parse_time("8h30"), Err(AppError::Format(_))));
        assert!(matches!(parse_time("25:00"), Err(AppError::Format(_))));
        assert!(parse_time("").is_err());
    }

    #[test]
    fn test_format_time_zero_pads() {
        assert_eq!(format_time(t(7, 5)), "07:05");
        assert_eq!(format_time(t(23, 59)), "23:59");
    }

    #[test]
    fn test_compare() {
        assert_eq!(compare(t(9, 0), t(11, 0)), Ordering::Less);
        assert_eq!(compare(t(11, 0), t(11, 0)), Ordering::Equal);
        assert_eq!(compare(t(13, 0), t(11, 0)), Ordering::Greater);
    }

    #[test]
    fn test_combine() {
        let combined = combine("2024-02-10", "09:15").unwrap();
        assert_eq!(combined.to_string(), "2024-02-10 09:15:00");
        assert!(combine("2024-02-30", "09:15").is_err());
        assert!(combine("2024-02-10", "nine").is_err());
    }
}
