//! Tutor schedule slots.
//!
//! A slot is a fixed one-hour window on a calendar date. Slots of the same
//! tutor never overlap; a slot is bookable while `is_available` is set and
//! no live booking holds it.

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::id::{ScheduleId, TutorId};
use crate::validation::rule;

/// Every slot lasts exactly this long.
pub const SLOT_MINUTES: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub tutor_id: TutorId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

impl Schedule {
    /// Half-open interval overlap on the same date.
    pub fn overlaps(&self, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> bool {
        self.date == date && self.start_time < end && self.end_time > start
    }
}

/// Check that `start..end` forms a valid one-hour slot.
///
/// Times are stored with whole-second precision, so fractional seconds
/// are refused rather than truncated.
pub fn check_slot(start: NaiveTime, end: NaiveTime) -> Result<(), &'static str> {
    if start.nanosecond() != 0 || end.nanosecond() != 0 {
        return Err("Schedule times cannot contain fractional seconds");
    }
    if end <= start {
        return Err("End time must be after start time");
    }
    if (end - start).num_minutes() != SLOT_MINUTES {
        return Err("Schedule slot must be exactly 60 minutes");
    }
    Ok(())
}

fn slot_rule(start: NaiveTime, end: NaiveTime) -> Result<(), ValidationError> {
    check_slot(start, end).map_err(|message| rule("slot_window", message))
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "check_create_window"))]
pub struct CreateScheduleRequest {
    #[validate(range(min = 1, message = "TutorId must be greater than 0"))]
    pub tutor_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

fn check_create_window(req: &CreateScheduleRequest) -> Result<(), ValidationError> {
    slot_rule(req.start_time, req.end_time)
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "check_update_window"))]
pub struct UpdateScheduleRequest {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn check_update_window(req: &UpdateScheduleRequest) -> Result<(), ValidationError> {
    slot_rule(req.start_time, req.end_time)
}

fn default_available() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn slot(day: u32, start: NaiveTime, end: NaiveTime) -> Schedule {
        Schedule {
            id: ScheduleId(1),
            tutor_id: TutorId(1),
            date: d(day),
            start_time: start,
            end_time: end,
            is_available: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_check_slot_accepts_one_hour() {
        assert!(check_slot(t(10, 0), t(11, 0)).is_ok());
        assert!(check_slot(t(9, 30), t(10, 30)).is_ok());
        assert!(check_slot(t(22, 0), t(23, 0)).is_ok());
    }

    #[test]
    fn test_check_slot_rejects_inverted_or_empty() {
        assert_eq!(
            check_slot(t(11, 0), t(10, 0)),
            Err("End time must be after start time")
        );
        assert!(check_slot(t(10, 0), t(10, 0)).is_err());
    }

    #[test]
    fn test_check_slot_rejects_wrong_length() {
        assert_eq!(
            check_slot(t(10, 0), t(11, 30)),
            Err("Schedule slot must be exactly 60 minutes")
        );
    }

    #[test]
    fn test_check_slot_rejects_fractional_seconds() {
        let start = NaiveTime::from_hms_milli_opt(10, 0, 0, 500).unwrap();
        let end = NaiveTime::from_hms_milli_opt(11, 0, 0, 500).unwrap();
        assert_eq!(
            check_slot(start, end),
            Err("Schedule times cannot contain fractional seconds")
        );

        let req: CreateScheduleRequest = serde_json::from_str(
            r#"{"tutor_id": 3, "date": "2026-03-10", "start_time": "10:00:00.250", "end_time": "11:00:00.250"}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_overlap_is_half_open() {
        let s = slot(10, t(10, 0), t(11, 0));
        assert!(s.overlaps(d(10), t(10, 30), t(11, 30)));
        assert!(s.overlaps(d(10), t(9, 30), t(10, 30)));
        // Touching edges do not overlap.
        assert!(!s.overlaps(d(10), t(11, 0), t(12, 0)));
        assert!(!s.overlaps(d(10), t(9, 0), t(10, 0)));
        // Different day.
        assert!(!s.overlaps(d(11), t(10, 0), t(11, 0)));
    }

    #[test]
    fn test_create_request_validation() {
        let req: CreateScheduleRequest = serde_json::from_str(
            r#"{"tutor_id": 3, "date": "2026-03-10", "start_time": "10:00:00", "end_time": "11:30:00"}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());

        let req = CreateScheduleRequest {
            tutor_id: 0,
            date: d(10),
            start_time: t(10, 0),
            end_time: t(11, 0),
        };
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("tutor_id"));
    }

    #[test]
    fn test_update_request_defaults_available() {
        let req: UpdateScheduleRequest = serde_json::from_str(
            r#"{"date": "2026-03-10", "start_time": "14:15:00", "end_time": "15:15:00"}"#,
        )
        .unwrap();
        assert!(req.is_available);
        assert!(req.validate().is_ok());
    }
}
