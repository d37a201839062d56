//! Schedule slot management.
//!
//! Tutors publish one-hour slots. A slot held by a live booking is frozen:
//! it cannot be moved, reopened, closed or deleted until the booking is
//! cancelled or removed.

use chrono::NaiveDate;
use tutorhub_types::error::{RepositoryError, ScheduleError};
use tutorhub_types::id::{ScheduleId, TutorId};
use tutorhub_types::schedule::{
    CreateScheduleRequest, Schedule, UpdateScheduleRequest, check_slot,
};

use crate::clock::Clock;
use crate::repository::schedule::{NewSchedule, ScheduleRepository};
use crate::repository::tutor::TutorRepository;

fn storage(e: RepositoryError) -> ScheduleError {
    ScheduleError::StorageError(e.to_string())
}

pub struct ScheduleService<S: ScheduleRepository, T: TutorRepository, C: Clock> {
    schedules: S,
    tutors: T,
    clock: C,
}

impl<S: ScheduleRepository, T: TutorRepository, C: Clock> ScheduleService<S, T, C> {
    pub fn new(schedules: S, tutors: T, clock: C) -> Self {
        Self {
            schedules,
            tutors,
            clock,
        }
    }

    /// Publish a new available slot for a tutor.
    pub async fn create(&self, request: CreateScheduleRequest) -> Result<Schedule, ScheduleError> {
        let tutor_id = TutorId(request.tutor_id);
        self.tutors
            .get_by_id(tutor_id)
            .await
            .map_err(storage)?
            .ok_or(ScheduleError::TutorNotFound(tutor_id))?;

        check_slot(request.start_time, request.end_time)
            .map_err(|msg| ScheduleError::InvalidSlot(msg.to_string()))?;

        if request.date < self.clock.today() {
            return Err(ScheduleError::PastDate);
        }

        let overlapping = self
            .schedules
            .find_overlapping(tutor_id, request.date, request.start_time, request.end_time, None)
            .await
            .map_err(storage)?;
        if !overlapping.is_empty() {
            tracing::debug!(tutor_id = %tutor_id, date = %request.date, "slot overlaps");
            return Err(ScheduleError::Overlap);
        }

        let slot = NewSchedule {
            tutor_id,
            date: request.date,
            start_time: request.start_time,
            end_time: request.end_time,
            created_at: self.clock.now(),
        };
        let created = self.schedules.create(&slot).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => ScheduleError::Overlap,
            other => storage(other),
        })?;

        tracing::info!(
            schedule_id = %created.id,
            tutor_id = %tutor_id,
            date = %created.date,
            "schedule created"
        );
        Ok(created)
    }

    /// Move or reopen a slot that no live booking holds.
    pub async fn update(
        &self,
        id: ScheduleId,
        request: UpdateScheduleRequest,
    ) -> Result<Schedule, ScheduleError> {
        let existing = self.get(id).await?;

        if self.schedules.has_live_booking(id).await.map_err(storage)? {
            return Err(ScheduleError::UpdateBooked);
        }

        check_slot(request.start_time, request.end_time)
            .map_err(|msg| ScheduleError::InvalidSlot(msg.to_string()))?;

        if request.date < self.clock.today() {
            return Err(ScheduleError::MoveToPast);
        }

        let overlapping = self
            .schedules
            .find_overlapping(
                existing.tutor_id,
                request.date,
                request.start_time,
                request.end_time,
                Some(id),
            )
            .await
            .map_err(storage)?;
        if !overlapping.is_empty() {
            return Err(ScheduleError::UpdatedOverlap);
        }

        let updated = self
            .schedules
            .update_unbooked(id, &request)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ScheduleError::NotFound(id),
                RepositoryError::Conflict(_) => ScheduleError::UpdatedOverlap,
                other => storage(other),
            })?
            .ok_or(ScheduleError::UpdateBooked)?;

        tracing::info!(schedule_id = %id, date = %updated.date, "schedule updated");
        Ok(updated)
    }

    /// Delete a slot. Cancelled bookings on it go with it.
    pub async fn delete(&self, id: ScheduleId) -> Result<(), ScheduleError> {
        self.get(id).await?;

        if self.schedules.has_live_booking(id).await.map_err(storage)? {
            return Err(ScheduleError::DeleteBooked);
        }

        if !self.schedules.delete_unbooked(id).await.map_err(storage)? {
            return Err(ScheduleError::DeleteBooked);
        }

        tracing::info!(schedule_id = %id, "schedule deleted");
        Ok(())
    }

    /// Withdraw an open slot from booking.
    pub async fn mark_unavailable(&self, id: ScheduleId) -> Result<Schedule, ScheduleError> {
        let slot = self.get(id).await?;

        if self.schedules.has_live_booking(id).await.map_err(storage)? {
            return Err(ScheduleError::CloseBooked);
        }
        if !slot.is_available {
            return Err(ScheduleError::AlreadyUnavailable);
        }

        if !self
            .schedules
            .set_availability_unbooked(id, false)
            .await
            .map_err(storage)?
        {
            return Err(ScheduleError::CloseBooked);
        }

        tracing::info!(schedule_id = %id, "schedule marked unavailable");
        Ok(Schedule {
            is_available: false,
            ..slot
        })
    }

    /// Reopen a withdrawn slot, provided it is not in the past.
    pub async fn mark_available(&self, id: ScheduleId) -> Result<Schedule, ScheduleError> {
        let slot = self.get(id).await?;

        if self.schedules.has_live_booking(id).await.map_err(storage)? {
            return Err(ScheduleError::ReopenBooked);
        }
        if slot.is_available {
            return Err(ScheduleError::AlreadyAvailable);
        }
        if slot.date < self.clock.today() {
            return Err(ScheduleError::ReopenPast);
        }

        if !self
            .schedules
            .set_availability_unbooked(id, true)
            .await
            .map_err(storage)?
        {
            return Err(ScheduleError::ReopenBooked);
        }

        tracing::info!(schedule_id = %id, "schedule marked available");
        Ok(Schedule {
            is_available: true,
            ..slot
        })
    }

    pub async fn get(&self, id: ScheduleId) -> Result<Schedule, ScheduleError> {
        self.schedules
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or(ScheduleError::NotFound(id))
    }

    pub async fn list(&self) -> Result<Vec<Schedule>, ScheduleError> {
        self.schedules.list().await.map_err(storage)
    }

    pub async fn by_tutor(&self, tutor_id: TutorId) -> Result<Vec<Schedule>, ScheduleError> {
        self.schedules.list_by_tutor(tutor_id).await.map_err(storage)
    }

    /// Open slots from today onwards.
    pub async fn available_by_tutor(
        &self,
        tutor_id: TutorId,
    ) -> Result<Vec<Schedule>, ScheduleError> {
        self.schedules
            .list_available_by_tutor(tutor_id, self.clock.today())
            .await
            .map_err(storage)
    }

    pub async fn by_tutor_and_date(
        &self,
        tutor_id: TutorId,
        date: NaiveDate,
    ) -> Result<Vec<Schedule>, ScheduleError> {
        self.schedules
            .list_by_tutor_and_date(tutor_id, date)
            .await
            .map_err(storage)
    }
}
