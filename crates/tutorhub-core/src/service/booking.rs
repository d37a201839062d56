//! Booking lifecycle service.
//!
//! Creating a booking runs the eligibility checks in a fixed order and then
//! claims the slot atomically through [`BookingRepository::claim_slot`].
//! Status changes follow the state machine on [`BookingStatus`]; cancelling
//! or deleting a booking hands its slot back to the tutor's calendar.

use tutorhub_types::booking::{Booking, BookingStatus, CreateBookingRequest};
use tutorhub_types::error::{BookingError, RepositoryError};
use tutorhub_types::id::{BookingId, ScheduleId, StudentId, TutorId, TutorSubjectId};
use tutorhub_types::page::{Page, PageRequest};

use crate::clock::Clock;
use crate::repository::booking::{BookingFilter, BookingRepository, ClaimOutcome, NewBooking};
use crate::repository::review::ReviewRepository;
use crate::repository::schedule::ScheduleRepository;
use crate::repository::student::StudentRepository;
use crate::repository::tutor::TutorRepository;
use crate::repository::tutor_subject::TutorSubjectRepository;

fn storage(e: RepositoryError) -> BookingError {
    BookingError::StorageError(e.to_string())
}

pub struct BookingService<B, S, TS, St, T, R, C>
where
    B: BookingRepository,
    S: ScheduleRepository,
    TS: TutorSubjectRepository,
    St: StudentRepository,
    T: TutorRepository,
    R: ReviewRepository,
    C: Clock,
{
    bookings: B,
    schedules: S,
    tutor_subjects: TS,
    students: St,
    tutors: T,
    reviews: R,
    clock: C,
}

impl<B, S, TS, St, T, R, C> BookingService<B, S, TS, St, T, R, C>
where
    B: BookingRepository,
    S: ScheduleRepository,
    TS: TutorSubjectRepository,
    St: StudentRepository,
    T: TutorRepository,
    R: ReviewRepository,
    C: Clock,
{
    pub fn new(
        bookings: B,
        schedules: S,
        tutor_subjects: TS,
        students: St,
        tutors: T,
        reviews: R,
        clock: C,
    ) -> Self {
        Self {
            bookings,
            schedules,
            tutor_subjects,
            students,
            tutors,
            reviews,
            clock,
        }
    }

    /// Book a slot for a student.
    ///
    /// Checks, in order: student, tutor subject and slot exist; the slot is
    /// available and not held by a live booking; the slot belongs to the
    /// offer's tutor; the slot is not in the past; the tutor supports the
    /// requested format; the student is free at that time. The claim itself
    /// re-checks availability and the student's calendar in one transaction.
    pub async fn create(&self, request: CreateBookingRequest) -> Result<Booking, BookingError> {
        let student_id = StudentId(request.student_id);
        let tutor_subject_id = TutorSubjectId(request.tutor_subject_id);
        let schedule_id = ScheduleId(request.schedule_id);

        self.students
            .get_by_id(student_id)
            .await
            .map_err(storage)?
            .ok_or(BookingError::StudentMissing(student_id))?;

        let offer = self
            .tutor_subjects
            .get_by_id(tutor_subject_id)
            .await
            .map_err(storage)?
            .ok_or(BookingError::TutorSubjectMissing(tutor_subject_id))?;

        let slot = self
            .schedules
            .get_by_id(schedule_id)
            .await
            .map_err(storage)?
            .ok_or(BookingError::ScheduleMissing(schedule_id))?;

        if !slot.is_available {
            tracing::debug!(schedule_id = %slot.id, "booking refused: slot unavailable");
            return Err(BookingError::SlotUnavailable);
        }

        if self
            .bookings
            .live_for_schedule(slot.id)
            .await
            .map_err(storage)?
            .is_some()
        {
            tracing::debug!(schedule_id = %slot.id, "booking refused: slot already booked");
            return Err(BookingError::SlotAlreadyBooked);
        }

        if slot.tutor_id != offer.tutor_id {
            return Err(BookingError::TutorMismatch);
        }

        if slot.date < self.clock.today() {
            return Err(BookingError::PastSlot);
        }

        let tutor = self
            .tutors
            .get_by_id(offer.tutor_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| {
                BookingError::StorageError(format!(
                    "tutor {} of tutor subject {} is missing",
                    offer.tutor_id, offer.id
                ))
            })?;
        if !tutor.supports(request.format) {
            return Err(BookingError::FormatUnavailable(request.format));
        }

        if self
            .bookings
            .student_has_overlap(student_id, slot.date, slot.start_time, slot.end_time)
            .await
            .map_err(storage)?
        {
            tracing::debug!(student_id = %student_id, "booking refused: student busy");
            return Err(BookingError::StudentBusy);
        }

        let new_booking = NewBooking {
            student_id,
            tutor_subject_id,
            schedule_id,
            format: request.format,
            created_at: self.clock.now(),
        };

        match self.bookings.claim_slot(&new_booking).await.map_err(storage)? {
            ClaimOutcome::Claimed(booking) => {
                tracing::info!(
                    booking_id = %booking.id,
                    schedule_id = %booking.schedule_id,
                    student_id = %booking.student_id,
                    "booking created"
                );
                Ok(booking)
            }
            ClaimOutcome::SlotTaken => {
                tracing::debug!(schedule_id = %schedule_id, "slot claimed by a concurrent booking");
                Err(BookingError::SlotAlreadyBooked)
            }
            ClaimOutcome::StudentBusy => Err(BookingError::StudentBusy),
        }
    }

    /// Move a booking to a new status.
    ///
    /// Completing requires the session date to have arrived; cancelling is
    /// refused once a review exists and releases the slot.
    pub async fn update_status(
        &self,
        id: BookingId,
        status: BookingStatus,
    ) -> Result<Booking, BookingError> {
        let booking = self.get(id).await?;
        let from = booking.status;

        if !from.can_transition_to(status) {
            tracing::debug!(booking_id = %id, %from, to = %status, "transition refused");
            return Err(BookingError::InvalidTransition { from, to: status });
        }

        match status {
            BookingStatus::Completed => {
                let slot = self
                    .schedules
                    .get_by_id(booking.schedule_id)
                    .await
                    .map_err(storage)?
                    .ok_or(BookingError::ScheduleMissing(booking.schedule_id))?;
                if slot.date > self.clock.today() {
                    return Err(BookingError::CompletionInFuture);
                }
            }
            BookingStatus::Cancelled => {
                if self
                    .reviews
                    .get_by_booking(id)
                    .await
                    .map_err(storage)?
                    .is_some()
                {
                    return Err(BookingError::ReviewedCancellation);
                }
            }
            BookingStatus::Pending | BookingStatus::Confirmed => {}
        }

        let release_slot = status == BookingStatus::Cancelled;
        let updated = self
            .bookings
            .transition(id, from, status, release_slot)
            .await
            .map_err(storage)?
            .ok_or(BookingError::StatusChanged(id))?;

        tracing::info!(
            booking_id = %id,
            schedule_id = %updated.schedule_id,
            %from,
            to = %status,
            slot_released = release_slot,
            "booking status changed"
        );
        Ok(updated)
    }

    /// Delete a booking and its review, and release the slot.
    pub async fn delete(&self, id: BookingId) -> Result<(), BookingError> {
        let booking = self.get(id).await?;

        let deleted = self
            .bookings
            .delete_releasing_slot(id)
            .await
            .map_err(storage)?;
        if !deleted {
            return Err(BookingError::NotFound(id));
        }

        tracing::info!(
            booking_id = %id,
            schedule_id = %booking.schedule_id,
            "booking deleted, slot released"
        );
        Ok(())
    }

    pub async fn get(&self, id: BookingId) -> Result<Booking, BookingError> {
        self.bookings
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or(BookingError::NotFound(id))
    }

    pub async fn list(&self) -> Result<Vec<Booking>, BookingError> {
        self.bookings.list().await.map_err(storage)
    }

    pub async fn by_student(&self, student_id: StudentId) -> Result<Vec<Booking>, BookingError> {
        self.bookings
            .list_by_student(student_id)
            .await
            .map_err(storage)
    }

    pub async fn by_tutor(&self, tutor_id: TutorId) -> Result<Vec<Booking>, BookingError> {
        self.bookings.list_by_tutor(tutor_id).await.map_err(storage)
    }

    pub async fn by_status(&self, status: BookingStatus) -> Result<Vec<Booking>, BookingError> {
        self.bookings.list_by_status(status).await.map_err(storage)
    }

    /// Newest-first page of bookings matching `filter`.
    pub async fn paginated(
        &self,
        page: PageRequest,
        filter: BookingFilter,
    ) -> Result<Page<Booking>, BookingError> {
        let (items, total) = self.bookings.page(filter, page).await.map_err(storage)?;
        Ok(Page::new(items, page, total))
    }
}
