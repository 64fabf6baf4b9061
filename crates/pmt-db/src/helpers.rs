//! Row-to-entity parsing helpers.
//!
//! Every repo needs to convert `libsql::Row` (column-indexed) into typed entity
//! structs. These helpers isolate the parsing logic and handle the dual datetime
//! format issue (`SQLite`'s `datetime('now')` vs Rust's RFC 3339 output).

use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};

use crate::error::DatabaseError;

/// The current time at storage precision, so that a value handed back to
/// the caller equals the one read back later.
#[must_use]
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Render a timestamp for storage.
///
/// Fixed microsecond precision keeps lexical order equal to chronological
/// order, which the `ORDER BY changed_at` queries rely on.
#[must_use]
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Render a calendar date for storage (`YYYY-MM-DD`).
#[must_use]
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse an optional `YYYY-MM-DD` column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string is not a valid date.
pub fn parse_optional_date(s: Option<&str>) -> Result<Option<NaiveDate>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| DatabaseError::Query(format!("Failed to parse date '{s}': {e}"))),
        _ => Ok(None),
    }
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with the pmt-core enums, which serialize as `SCREAMING_SNAKE_CASE`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
/// You must use `get::<Option<String>>()` for nullable columns.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmt_core::enums::{TaskPriority, TaskStatus};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn datetime_round_trips_through_storage_format() {
        let now = Utc::now();
        let parsed = parse_datetime(&format_datetime(&now)).unwrap();
        assert_eq!(parsed.timestamp_micros(), now.timestamp_micros());
    }

    #[test]
    fn now_survives_storage() {
        let now = now();
        assert_eq!(parse_datetime(&format_datetime(&now)).unwrap(), now);
    }

    #[test]
    fn storage_format_has_fixed_width() {
        let a = parse_datetime("2026-02-09T14:30:00Z").unwrap();
        let b = parse_datetime("2026-02-09T14:30:00.5Z").unwrap();
        let (a, b) = (format_datetime(&a), format_datetime(&b));
        assert_eq!(a.len(), b.len());
        assert!(a < b);
    }

    #[test]
    fn sqlite_datetime_format_parses() {
        let dt = parse_datetime("2026-02-09 14:30:00").unwrap();
        assert_eq!(format_datetime(&dt), "2026-02-09T14:30:00.000000Z");
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("2026-03-01"), NaiveDate::from_ymd_opt(2026, 3, 1))]
    fn optional_dates(#[case] raw: Option<&str>, #[case] expected: Option<NaiveDate>) {
        assert_eq!(parse_optional_date(raw).unwrap(), expected);
    }

    #[test]
    fn corrupt_date_is_an_error() {
        assert!(parse_optional_date(Some("03/01/2026")).is_err());
    }

    #[test]
    fn enums_parse_from_stored_names() {
        assert_eq!(parse_enum::<TaskStatus>("IN_PROGRESS").unwrap(), TaskStatus::InProgress);
        assert_eq!(parse_enum::<TaskPriority>("HIGH").unwrap(), TaskPriority::High);
        assert!(parse_enum::<TaskStatus>("in_progress").is_err());
    }
}
