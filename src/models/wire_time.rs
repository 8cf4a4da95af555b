//! `time_of_task` on the wire.
//!
//! The backend echoes whatever its JSON provider produces for a naive
//! datetime column, so several shapes are accepted. Naive values are UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

pub(crate) fn parse_wire_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

pub(crate) fn format_wire_time(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

pub(super) fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_wire_time(dt))
}

pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_wire_time(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn expected() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_parses_rfc2822_gmt() {
        assert_eq!(
            parse_wire_time("Tue, 15 Oct 2024 10:30:00 GMT"),
            Some(expected())
        );
    }

    #[test]
    fn test_parses_rfc3339_with_offset() {
        assert_eq!(
            parse_wire_time("2024-10-15T12:30:00+02:00"),
            Some(expected())
        );
        assert_eq!(parse_wire_time("2024-10-15T10:30:00.000Z"), Some(expected()));
    }

    #[test]
    fn test_parses_naive_forms_as_utc() {
        assert_eq!(parse_wire_time("2024-10-15T10:30:00"), Some(expected()));
        assert_eq!(parse_wire_time("2024-10-15T10:30"), Some(expected()));
        assert_eq!(parse_wire_time("2024-10-15 10:30:00"), Some(expected()));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_wire_time(""), None);
        assert_eq!(parse_wire_time("yesterday"), None);
    }

    #[test]
    fn test_format_matches_duplicate_endpoint_expectation() {
        assert_eq!(format_wire_time(&expected()), "2024-10-15T10:30:00.000Z");
    }
}
