//! Schedule slot repository trait definition.
//!
//! Every mutation of an existing slot is guarded against live bookings
//! inside the write itself, so a booking that lands between the service's
//! checks and the write cannot be orphaned or double-claimed.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tutorhub_types::error::RepositoryError;
use tutorhub_types::id::{ScheduleId, TutorId};
use tutorhub_types::schedule::{Schedule, UpdateScheduleRequest};

/// A slot about to be inserted. New slots are always available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSchedule {
    pub tutor_id: TutorId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

pub trait ScheduleRepository: Send + Sync {
    fn create(
        &self,
        slot: &NewSchedule,
    ) -> impl std::future::Future<Output = Result<Schedule, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: ScheduleId,
    ) -> impl std::future::Future<Output = Result<Option<Schedule>, RepositoryError>> + Send;

    /// All slots ordered by date, then start time.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Schedule>, RepositoryError>> + Send;

    fn list_by_tutor(
        &self,
        tutor_id: TutorId,
    ) -> impl std::future::Future<Output = Result<Vec<Schedule>, RepositoryError>> + Send;

    /// Available slots of a tutor dated on or after `from`.
    fn list_available_by_tutor(
        &self,
        tutor_id: TutorId,
        from: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Vec<Schedule>, RepositoryError>> + Send;

    fn list_by_tutor_and_date(
        &self,
        tutor_id: TutorId,
        date: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Vec<Schedule>, RepositoryError>> + Send;

    /// Slots of `tutor_id` on `date` whose interval intersects `[start, end)`.
    fn find_overlapping(
        &self,
        tutor_id: TutorId,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        exclude: Option<ScheduleId>,
    ) -> impl std::future::Future<Output = Result<Vec<Schedule>, RepositoryError>> + Send;

    /// Whether a non-cancelled booking holds the slot.
    fn has_live_booking(
        &self,
        id: ScheduleId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Rewrite date, times and availability unless a live booking holds
    /// the slot. `Ok(None)` means the guard refused the write; an overlap
    /// with another slot of the tutor is a `Conflict`.
    fn update_unbooked(
        &self,
        id: ScheduleId,
        request: &UpdateScheduleRequest,
    ) -> impl std::future::Future<Output = Result<Option<Schedule>, RepositoryError>> + Send;

    /// Flip `is_available` unless a live booking holds the slot. Returns
    /// whether the row was written.
    fn set_availability_unbooked(
        &self,
        id: ScheduleId,
        available: bool,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Delete the slot (and any cancelled bookings on it) unless a live
    /// booking holds it. Returns whether the row was deleted.
    fn delete_unbooked(
        &self,
        id: ScheduleId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
