//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools. Column encodings shared by every table:
//! timestamps are RFC 3339 text, dates `YYYY-MM-DD`, times `HH:MM:SS`,
//! booleans 0/1, money integer cents.

pub mod booking;
pub mod city;
pub mod pool;
pub mod review;
pub mod schedule;
pub mod student;
pub mod subject;
pub mod teaching_level;
pub mod tutor;
pub mod tutor_subject;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tutorhub_types::error::RepositoryError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

pub(crate) fn query_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

/// Whether `e` is a UNIQUE constraint failure. `column` narrows the check
/// to constraint messages that mention it.
pub(crate) fn is_unique_violation(e: &sqlx::Error, column: Option<&str>) -> bool {
    match e {
        sqlx::Error::Database(db_err) => {
            let msg = db_err.message();
            msg.contains("UNIQUE") && column.is_none_or(|c| msg.contains(c))
        }
        _ => false,
    }
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| RepositoryError::Query(format!("invalid date '{s}': {e}")))
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_time(s: &str) -> Result<NaiveTime, RepositoryError> {
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .map_err(|e| RepositoryError::Query(format!("invalid time '{s}': {e}")))
}

pub(crate) fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_text_sorts_chronologically() {
        let early = format_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        let late = format_time(NaiveTime::from_hms_opt(10, 30, 0).unwrap());
        assert_eq!(early, "09:00:00");
        assert!(early < late);
        assert_eq!(parse_time(&late).unwrap(), NaiveTime::from_hms_opt(10, 30, 0).unwrap());
    }

    #[test]
    fn test_date_round_trip() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 3).unwrap();
        assert_eq!(format_date(date), "2026-02-03");
        assert_eq!(parse_date("2026-02-03").unwrap(), date);
        assert!(parse_date("03.02.2026").is_err());
    }
}
