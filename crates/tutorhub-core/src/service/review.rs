//! Post-session reviews.
//!
//! A review may only be written, or edited, for a completed booking whose
//! session date is already behind us. Each booking carries at most one.

use tutorhub_types::booking::{Booking, BookingStatus};
use tutorhub_types::error::{RepositoryError, ReviewError};
use tutorhub_types::id::{BookingId, ReviewId, StudentId, TutorId};
use tutorhub_types::review::{
    CreateReviewRequest, MAX_RATING, MIN_RATING, Review, UpdateReviewRequest,
};

use crate::clock::Clock;
use crate::repository::booking::BookingRepository;
use crate::repository::review::ReviewRepository;
use crate::repository::schedule::ScheduleRepository;

fn storage(e: RepositoryError) -> ReviewError {
    ReviewError::StorageError(e.to_string())
}

/// Which operation an eligibility check runs for; only the messages differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Purpose {
    Create,
    Update,
}

pub struct ReviewService<R, B, S, C>
where
    R: ReviewRepository,
    B: BookingRepository,
    S: ScheduleRepository,
    C: Clock,
{
    reviews: R,
    bookings: B,
    schedules: S,
    clock: C,
}

impl<R, B, S, C> ReviewService<R, B, S, C>
where
    R: ReviewRepository,
    B: BookingRepository,
    S: ScheduleRepository,
    C: Clock,
{
    pub fn new(reviews: R, bookings: B, schedules: S, clock: C) -> Self {
        Self {
            reviews,
            bookings,
            schedules,
            clock,
        }
    }

    async fn check_eligible(&self, booking: &Booking, purpose: Purpose) -> Result<(), ReviewError> {
        if booking.status != BookingStatus::Completed {
            return Err(match purpose {
                Purpose::Create => ReviewError::NotCompleted,
                Purpose::Update => ReviewError::UpdateNotCompleted,
            });
        }

        let slot = self
            .schedules
            .get_by_id(booking.schedule_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| {
                ReviewError::StorageError(format!(
                    "schedule {} of booking {} is missing",
                    booking.schedule_id, booking.id
                ))
            })?;

        if slot.date >= self.clock.today() {
            return Err(match purpose {
                Purpose::Create => ReviewError::SessionNotPast,
                Purpose::Update => ReviewError::UpdateSessionNotPast,
            });
        }
        Ok(())
    }

    async fn booking(&self, id: BookingId) -> Result<Booking, ReviewError> {
        self.bookings
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or(ReviewError::BookingMissing(id))
    }

    pub async fn create(&self, request: CreateReviewRequest) -> Result<Review, ReviewError> {
        let booking_id = BookingId(request.booking_id);
        let booking = self.booking(booking_id).await?;

        self.check_eligible(&booking, Purpose::Create).await?;

        if self
            .reviews
            .get_by_booking(booking_id)
            .await
            .map_err(storage)?
            .is_some()
        {
            return Err(ReviewError::AlreadyExists(booking_id));
        }

        let review = self
            .reviews
            .create(&request, self.clock.now())
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => ReviewError::AlreadyExists(booking_id),
                other => storage(other),
            })?;

        tracing::info!(
            review_id = %review.id,
            booking_id = %booking_id,
            rating = review.rating,
            "review created"
        );
        Ok(review)
    }

    pub async fn update(
        &self,
        id: ReviewId,
        request: UpdateReviewRequest,
    ) -> Result<Review, ReviewError> {
        let existing = self.get(id).await?;
        let booking = self.booking(existing.booking_id).await?;

        self.check_eligible(&booking, Purpose::Update).await?;

        let review = self
            .reviews
            .update(id, &request)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ReviewError::NotFound(id),
                other => storage(other),
            })?;

        tracing::info!(review_id = %id, rating = review.rating, "review updated");
        Ok(review)
    }

    pub async fn delete(&self, id: ReviewId) -> Result<(), ReviewError> {
        self.get(id).await?;
        self.reviews.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => ReviewError::NotFound(id),
            other => storage(other),
        })?;
        tracing::info!(review_id = %id, "review deleted");
        Ok(())
    }

    pub async fn get(&self, id: ReviewId) -> Result<Review, ReviewError> {
        self.reviews
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or(ReviewError::NotFound(id))
    }

    pub async fn list(&self) -> Result<Vec<Review>, ReviewError> {
        self.reviews.list().await.map_err(storage)
    }

    pub async fn by_booking(&self, booking_id: BookingId) -> Result<Review, ReviewError> {
        self.reviews
            .get_by_booking(booking_id)
            .await
            .map_err(storage)?
            .ok_or(ReviewError::NoReviewForBooking(booking_id))
    }

    pub async fn by_student(&self, student_id: StudentId) -> Result<Vec<Review>, ReviewError> {
        self.reviews.list_by_student(student_id).await.map_err(storage)
    }

    pub async fn by_tutor(&self, tutor_id: TutorId) -> Result<Vec<Review>, ReviewError> {
        self.reviews.list_by_tutor(tutor_id).await.map_err(storage)
    }

    pub async fn by_rating(&self, rating: i64) -> Result<Vec<Review>, ReviewError> {
        let rating = i16::try_from(rating)
            .ok()
            .filter(|r| (MIN_RATING..=MAX_RATING).contains(r))
            .ok_or(ReviewError::InvalidRating(rating))?;
        self.reviews.list_by_rating(rating).await.map_err(storage)
    }
}
