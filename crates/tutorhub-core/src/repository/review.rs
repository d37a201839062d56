//! Review repository trait definition.

use chrono::{DateTime, Utc};
use tutorhub_types::error::RepositoryError;
use tutorhub_types::id::{BookingId, ReviewId, StudentId, TutorId};
use tutorhub_types::review::{CreateReviewRequest, Review, UpdateReviewRequest};

pub trait ReviewRepository: Send + Sync {
    /// Insert a review. A second review for the same booking yields
    /// `RepositoryError::Conflict`.
    fn create(
        &self,
        request: &CreateReviewRequest,
        created_at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<Review, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: ReviewId,
    ) -> impl std::future::Future<Output = Result<Option<Review>, RepositoryError>> + Send;

    fn get_by_booking(
        &self,
        booking_id: BookingId,
    ) -> impl std::future::Future<Output = Result<Option<Review>, RepositoryError>> + Send;

    /// All reviews, newest first.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Review>, RepositoryError>> + Send;

    fn list_by_student(
        &self,
        student_id: StudentId,
    ) -> impl std::future::Future<Output = Result<Vec<Review>, RepositoryError>> + Send;

    /// Reviews on sessions held in the tutor's schedule slots.
    fn list_by_tutor(
        &self,
        tutor_id: TutorId,
    ) -> impl std::future::Future<Output = Result<Vec<Review>, RepositoryError>> + Send;

    fn list_by_rating(
        &self,
        rating: i16,
    ) -> impl std::future::Future<Output = Result<Vec<Review>, RepositoryError>> + Send;

    fn update(
        &self,
        id: ReviewId,
        request: &UpdateReviewRequest,
    ) -> impl std::future::Future<Output = Result<Review, RepositoryError>> + Send;

    fn delete(
        &self,
        id: ReviewId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
