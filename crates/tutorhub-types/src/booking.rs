//! Bookings and their status state machine.
//!
//! ```text
//! Pending ──► Confirmed ──► Completed
//!    │            │
//!    └──► Cancelled ◄┘
//! ```
//!
//! Completed and Cancelled are terminal. Only live (non-cancelled) bookings
//! hold their schedule slot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use std::fmt;
use std::str::FromStr;

use crate::id::{BookingId, ScheduleId, StudentId, TutorSubjectId};

/// How the session is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingFormat {
    #[serde(alias = "Online")]
    Online,
    #[serde(alias = "Offline")]
    Offline,
}

impl fmt::Display for BookingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingFormat::Online => write!(f, "online"),
            BookingFormat::Offline => write!(f, "offline"),
        }
    }
}

impl FromStr for BookingFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "online" => Ok(BookingFormat::Online),
            "offline" => Ok(BookingFormat::Offline),
            other => Err(format!("invalid booking format: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    #[serde(alias = "Pending")]
    Pending,
    #[serde(alias = "Confirmed")]
    Confirmed,
    #[serde(alias = "Completed")]
    Completed,
    #[serde(alias = "Cancelled")]
    Cancelled,
}

impl BookingStatus {
    /// Statuses in which a booking still claims its slot and its student's time.
    pub const ACTIVE: [BookingStatus; 2] = [BookingStatus::Pending, BookingStatus::Confirmed];

    /// Whether `self -> next` is an allowed transition.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Completed) | (Confirmed, Cancelled)
        )
    }

    pub fn is_active(self) -> bool {
        Self::ACTIVE.contains(&self)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" | "canceled" => Ok(BookingStatus::Cancelled),
            other => Err(format!("invalid booking status: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub student_id: StudentId,
    pub tutor_subject_id: TutorSubjectId,
    pub schedule_id: ScheduleId,
    pub format: BookingFormat,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBookingRequest {
    #[validate(range(min = 1, message = "StudentId must be greater than 0"))]
    pub student_id: i64,

    #[validate(range(min = 1, message = "TutorSubjectId must be greater than 0"))]
    pub tutor_subject_id: i64,

    #[validate(range(min = 1, message = "ScheduleId must be greater than 0"))]
    pub schedule_id: i64,

    pub format: BookingFormat,
}

/// Status is the only mutable part of a booking.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateBookingRequest {
    pub status: BookingStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use BookingStatus::*;

    const ALL: [BookingStatus; 4] = [Pending, Confirmed, Completed, Cancelled];

    #[test]
    fn test_allowed_transitions() {
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Cancelled));
    }

    #[test]
    fn test_rejected_transitions() {
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Confirmed.can_transition_to(Pending));
        for from in ALL {
            assert!(!from.can_transition_to(from), "{from} -> {from} must be rejected");
        }
    }

    #[test]
    fn test_terminal_states_have_no_exit() {
        for from in [Completed, Cancelled] {
            assert!(from.is_terminal());
            assert!(ALL.iter().all(|to| !from.can_transition_to(*to)));
        }
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("CONFIRMED".parse::<BookingStatus>().unwrap(), Confirmed);
        assert_eq!("Cancelled".parse::<BookingStatus>().unwrap(), Cancelled);
        assert!("done".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn test_status_serde_accepts_pascal_case() {
        let req: UpdateBookingRequest = serde_json::from_str(r#"{"status": "Completed"}"#).unwrap();
        assert_eq!(req.status, Completed);
        assert_eq!(serde_json::to_string(&Completed).unwrap(), "\"completed\"");
    }

    #[test]
    fn test_active_statuses() {
        assert!(Pending.is_active());
        assert!(Confirmed.is_active());
        assert!(!Completed.is_active());
        assert!(!Cancelled.is_active());
    }
}
