//! Booking repository trait definition.
//!
//! Slot claiming, status transitions and deletion each run as a single
//! writer transaction in the implementation. The service performs the
//! friendly pre-checks; these methods are the authoritative guards.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tutorhub_types::booking::{Booking, BookingFormat, BookingStatus};
use tutorhub_types::error::RepositoryError;
use tutorhub_types::id::{BookingId, ScheduleId, StudentId, TutorId, TutorSubjectId};
use tutorhub_types::page::PageRequest;

/// A booking about to be inserted with status pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub student_id: StudentId,
    pub tutor_subject_id: TutorSubjectId,
    pub schedule_id: ScheduleId,
    pub format: BookingFormat,
    pub created_at: DateTime<Utc>,
}

/// Result of trying to claim a slot for a new booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed(Booking),
    /// The slot was no longer available when the guarded update ran.
    SlotTaken,
    /// The student gained an overlapping pending or confirmed booking.
    StudentBusy,
}

/// Filter criteria for the paginated booking listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub student_id: Option<StudentId>,
    pub tutor_id: Option<TutorId>,
}

pub trait BookingRepository: Send + Sync {
    /// In one transaction: flip the slot from available to unavailable,
    /// re-check the student's overlapping bookings, insert the booking.
    /// Any refusal rolls the whole transaction back.
    fn claim_slot(
        &self,
        booking: &NewBooking,
    ) -> impl std::future::Future<Output = Result<ClaimOutcome, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: BookingId,
    ) -> impl std::future::Future<Output = Result<Option<Booking>, RepositoryError>> + Send;

    /// All bookings, newest first.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Booking>, RepositoryError>> + Send;

    fn list_by_student(
        &self,
        student_id: StudentId,
    ) -> impl std::future::Future<Output = Result<Vec<Booking>, RepositoryError>> + Send;

    /// Bookings of a tutor, resolved through the tutor subject.
    fn list_by_tutor(
        &self,
        tutor_id: TutorId,
    ) -> impl std::future::Future<Output = Result<Vec<Booking>, RepositoryError>> + Send;

    fn list_by_status(
        &self,
        status: BookingStatus,
    ) -> impl std::future::Future<Output = Result<Vec<Booking>, RepositoryError>> + Send;

    /// One page, newest first, plus the total matching count.
    fn page(
        &self,
        filter: BookingFilter,
        page: PageRequest,
    ) -> impl std::future::Future<Output = Result<(Vec<Booking>, i64), RepositoryError>> + Send;

    /// The non-cancelled booking holding a slot, if any.
    fn live_for_schedule(
        &self,
        schedule_id: ScheduleId,
    ) -> impl std::future::Future<Output = Result<Option<Booking>, RepositoryError>> + Send;

    /// Whether the student has a pending or confirmed booking on `date`
    /// whose slot intersects `[start, end)`.
    fn student_has_overlap(
        &self,
        student_id: StudentId,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Move a booking from `from` to `to` with a guarded update. With
    /// `release_slot`, the booking's slot becomes available again in the
    /// same transaction. `Ok(None)` means the booking was no longer in
    /// `from`.
    fn transition(
        &self,
        id: BookingId,
        from: BookingStatus,
        to: BookingStatus,
        release_slot: bool,
    ) -> impl std::future::Future<Output = Result<Option<Booking>, RepositoryError>> + Send;

    /// Delete a booking (its review cascades). A slot held by a live or
    /// completed booking becomes available again; a cancelled booking's slot
    /// is left as it is. Returns false when the booking does not exist.
    fn delete_releasing_slot(
        &self,
        id: BookingId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
