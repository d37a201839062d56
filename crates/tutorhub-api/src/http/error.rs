//! Application error type mapping to HTTP status codes and envelope format.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use tutorhub_types::error::{
    AccountError, BookingError, CatalogError, PageError, ReviewError, ScheduleError,
};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Catalog(CatalogError),
    Account(AccountError),
    Schedule(ScheduleError),
    Booking(BookingError),
    Review(ReviewError),
    /// Malformed body, query string or path, or a failed field rule.
    Validation(String),
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        AppError::Catalog(e)
    }
}

impl From<AccountError> for AppError {
    fn from(e: AccountError) -> Self {
        AppError::Account(e)
    }
}

impl From<ScheduleError> for AppError {
    fn from(e: ScheduleError) -> Self {
        AppError::Schedule(e)
    }
}

impl From<BookingError> for AppError {
    fn from(e: BookingError) -> Self {
        AppError::Booking(e)
    }
}

impl From<ReviewError> for AppError {
    fn from(e: ReviewError) -> Self {
        AppError::Review(e)
    }
}

impl From<PageError> for AppError {
    fn from(e: PageError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

const NOT_FOUND: (StatusCode, &str) = (StatusCode::NOT_FOUND, "NOT_FOUND");
const CONFLICT: (StatusCode, &str) = (StatusCode::CONFLICT, "CONFLICT");
const BUSINESS_RULE: (StatusCode, &str) = (StatusCode::BAD_REQUEST, "BUSINESS_RULE");
const INVALID_REFERENCE: (StatusCode, &str) = (StatusCode::BAD_REQUEST, "INVALID_REFERENCE");
const VALIDATION: (StatusCode, &str) = (StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
const INTERNAL: (StatusCode, &str) = (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR");

impl AppError {
    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Catalog(e) => match e {
                CatalogError::NotFound(_) => NOT_FOUND,
                CatalogError::Duplicate(_) => CONFLICT,
                CatalogError::InUse(_) => BUSINESS_RULE,
                CatalogError::StorageError(_) => INTERNAL,
            },
            AppError::Account(e) => match e {
                AccountError::NotFound(_) => NOT_FOUND,
                AccountError::EmailTaken(_) | AccountError::PhoneTaken(_) => CONFLICT,
                AccountError::CityMissing(_) => INVALID_REFERENCE,
                AccountError::WrongUserType { .. }
                | AccountError::OfflineRequiresLocation
                | AccountError::NoFormatAvailable
                | AccountError::BirthDateNotPast => BUSINESS_RULE,
                AccountError::InvalidArgument(_) | AccountError::Page(_) => VALIDATION,
                AccountError::StorageError(_) => INTERNAL,
            },
            AppError::Schedule(e) => match e {
                ScheduleError::NotFound(_) => NOT_FOUND,
                ScheduleError::TutorNotFound(_) => INVALID_REFERENCE,
                ScheduleError::Overlap | ScheduleError::UpdatedOverlap => CONFLICT,
                ScheduleError::InvalidSlot(_) => VALIDATION,
                ScheduleError::StorageError(_) => INTERNAL,
                _ => BUSINESS_RULE,
            },
            AppError::Booking(e) => match e {
                BookingError::NotFound(_) => NOT_FOUND,
                BookingError::StudentMissing(_)
                | BookingError::TutorSubjectMissing(_)
                | BookingError::ScheduleMissing(_) => INVALID_REFERENCE,
                BookingError::SlotUnavailable
                | BookingError::SlotAlreadyBooked
                | BookingError::StudentBusy
                | BookingError::StatusChanged(_) => CONFLICT,
                BookingError::Page(_) => VALIDATION,
                BookingError::StorageError(_) => INTERNAL,
                _ => BUSINESS_RULE,
            },
            AppError::Review(e) => match e {
                ReviewError::NotFound(_) | ReviewError::NoReviewForBooking(_) => NOT_FOUND,
                ReviewError::BookingMissing(_) => INVALID_REFERENCE,
                ReviewError::AlreadyExists(_) => CONFLICT,
                ReviewError::InvalidRating(_) => VALIDATION,
                ReviewError::StorageError(_) => INTERNAL,
                _ => BUSINESS_RULE,
            },
            AppError::Validation(_) => VALIDATION,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Catalog(e) => e.to_string(),
            AppError::Account(e) => e.to_string(),
            AppError::Schedule(e) => e.to_string(),
            AppError::Booking(e) => e.to_string(),
            AppError::Review(e) => e.to_string(),
            AppError::Validation(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(code, %message, "request failed");
        } else {
            tracing::debug!(code, %message, "request rejected");
        }

        let request_id = uuid::Uuid::now_v7().to_string();
        ApiResponse::error(status, code, &message, request_id).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutorhub_types::booking::BookingStatus;
    use tutorhub_types::id::{BookingId, CityId, ScheduleId};

    fn status_of(e: impl Into<AppError>) -> StatusCode {
        e.into().into_response().status()
    }

    #[test]
    fn test_not_found_is_404() {
        assert_eq!(status_of(BookingError::NotFound(BookingId(1))), StatusCode::NOT_FOUND);
        assert_eq!(status_of(ScheduleError::NotFound(ScheduleId(1))), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(CatalogError::NotFound("missing".to_string())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_slot_races_are_409() {
        assert_eq!(status_of(BookingError::SlotAlreadyBooked), StatusCode::CONFLICT);
        assert_eq!(status_of(BookingError::StudentBusy), StatusCode::CONFLICT);
        assert_eq!(status_of(ScheduleError::Overlap), StatusCode::CONFLICT);
    }

    #[test]
    fn test_business_rules_are_400() {
        let transition = BookingError::InvalidTransition {
            from: BookingStatus::Completed,
            to: BookingStatus::Pending,
        };
        assert_eq!(AppError::from(transition).classify(), BUSINESS_RULE);
        assert_eq!(AppError::from(ScheduleError::DeleteBooked).classify(), BUSINESS_RULE);
        assert_eq!(
            AppError::from(AccountError::CityMissing(CityId(9))).classify(),
            INVALID_REFERENCE
        );
    }

    #[test]
    fn test_page_error_is_validation() {
        assert_eq!(AppError::from(PageError::InvalidPageSize).classify(), VALIDATION);
    }

    #[test]
    fn test_storage_error_is_500() {
        assert_eq!(
            status_of(ReviewError::StorageError("disk".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
