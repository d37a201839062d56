use thiserror::Error;

use crate::account::UserType;
use crate::booking::{BookingFormat, BookingStatus};
use crate::id::{BookingId, CityId, ReviewId, ScheduleId, StudentId, TutorId, TutorSubjectId};

/// Errors from repository operations (used by trait definitions in tutorhub-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Invalid paging arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("Page number must be greater than 0")]
    InvalidPageNumber,

    #[error("Page size must be between 1 and 100")]
    InvalidPageSize,
}

/// Errors for cities, subjects, teaching levels and tutor subjects.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Duplicate(String),

    /// The entity is still referenced and cannot be removed or changed.
    #[error("{0}")]
    InUse(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors for student and tutor accounts.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{0}")]
    NotFound(String),

    #[error("User with email {0} already exists")]
    EmailTaken(String),

    #[error("User with phone {0} already exists")]
    PhoneTaken(String),

    #[error("UserType must be {expected} when creating a {role}")]
    WrongUserType { expected: UserType, role: &'static str },

    #[error("City with id {0} does not exist")]
    CityMissing(CityId),

    #[error("Offline tutors must have a city and address")]
    OfflineRequiresLocation,

    #[error("Tutor must be available either online or offline")]
    NoFormatAvailable,

    #[error("Date of birth must be in the past")]
    BirthDateNotPast,

    #[error("{0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors for schedule slot management.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Schedule with id {0} not found")]
    NotFound(ScheduleId),

    #[error("Tutor with id {0} not found")]
    TutorNotFound(TutorId),

    #[error("Cannot create schedules in the past")]
    PastDate,

    #[error("Cannot move schedule to a past date")]
    MoveToPast,

    #[error("Schedule overlaps with an existing slot for this tutor")]
    Overlap,

    #[error("Updated time slot overlaps with an existing schedule for this tutor")]
    UpdatedOverlap,

    #[error("Cannot update a schedule that already has a booking")]
    UpdateBooked,

    #[error("Cannot delete a schedule that has an associated booking")]
    DeleteBooked,

    #[error("Cannot mark schedule as unavailable - it already has a booking")]
    CloseBooked,

    #[error("Cannot mark schedule as available - it has an associated booking")]
    ReopenBooked,

    #[error("Schedule is already marked as unavailable")]
    AlreadyUnavailable,

    #[error("Schedule is already marked as available")]
    AlreadyAvailable,

    #[error("Cannot mark past schedule as available")]
    ReopenPast,

    #[error("{0}")]
    InvalidSlot(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors for the booking lifecycle.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Booking with id {0} not found")]
    NotFound(BookingId),

    #[error("Student with id {0} does not exist")]
    StudentMissing(StudentId),

    #[error("Tutor subject with id {0} does not exist")]
    TutorSubjectMissing(TutorSubjectId),

    #[error("Schedule with id {0} does not exist")]
    ScheduleMissing(ScheduleId),

    #[error("Schedule slot is not available")]
    SlotUnavailable,

    #[error("Schedule slot is already booked")]
    SlotAlreadyBooked,

    #[error("Schedule does not belong to the tutor offering this subject")]
    TutorMismatch,

    #[error("Cannot book past schedule slots")]
    PastSlot,

    #[error("This tutor is not available for {0} sessions")]
    FormatUnavailable(BookingFormat),

    #[error("Student already has a booking at this time")]
    StudentBusy,

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Cannot mark future bookings as completed")]
    CompletionInFuture,

    #[error("Cannot cancel a booking that has been reviewed")]
    ReviewedCancellation,

    /// A concurrent request moved the booking out of the status this
    /// request was validated against.
    #[error("Booking {0} was modified by another request")]
    StatusChanged(BookingId),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors for post-session reviews.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Review with id {0} not found")]
    NotFound(ReviewId),

    #[error("Booking with id {0} does not exist")]
    BookingMissing(BookingId),

    #[error("No review found for booking {0}")]
    NoReviewForBooking(BookingId),

    #[error("Can only create reviews for completed bookings")]
    NotCompleted,

    #[error("Can only update reviews for completed bookings")]
    UpdateNotCompleted,

    #[error("Can only review past sessions")]
    SessionNotPast,

    #[error("Can only update reviews after the session date has passed")]
    UpdateSessionNotPast,

    #[error("Review already exists for booking {0}")]
    AlreadyExists(BookingId),

    #[error("Rating must be between 1 and 5")]
    InvalidRating(i64),

    #[error("storage error: {0}")]
    StorageError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_booking_transition_error_display() {
        let err = BookingError::InvalidTransition {
            from: BookingStatus::Completed,
            to: BookingStatus::Pending,
        };
        assert_eq!(
            err.to_string(),
            "Invalid status transition from completed to pending"
        );
    }

    #[test]
    fn test_format_unavailable_display() {
        let err = BookingError::FormatUnavailable(BookingFormat::Offline);
        assert_eq!(
            err.to_string(),
            "This tutor is not available for offline sessions"
        );
    }

    #[test]
    fn test_wrong_user_type_display() {
        let err = AccountError::WrongUserType {
            expected: UserType::Tutor,
            role: "tutor",
        };
        assert_eq!(err.to_string(), "UserType must be tutor when creating a tutor");
    }

    #[test]
    fn test_page_error_passes_through() {
        let err: BookingError = PageError::InvalidPageSize.into();
        assert_eq!(err.to_string(), "Page size must be between 1 and 100");
    }
}
