//! Query parameter extractors for the paginated list endpoints.

use axum::extract::FromRequestParts;
use serde::Deserialize;

use crate::http::error::AppError;

/// `axum::extract::Query` with parse failures reported as `VALIDATION_ERROR`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

fn default_page_number() -> i64 {
    1
}

fn default_page_size() -> i64 {
    10
}

/// `GET /students/paginated`
#[derive(Debug, Deserialize)]
pub struct StudentPageQuery {
    #[serde(default = "default_page_number")]
    pub page_number: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    pub city_id: Option<i64>,
    pub school_grade: Option<i16>,
}

/// `GET /tutors/paginated`
#[derive(Debug, Deserialize)]
pub struct TutorPageQuery {
    #[serde(default = "default_page_number")]
    pub page_number: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    /// experience, name or id.
    pub sort_by: Option<String>,
    #[serde(default)]
    pub descending: bool,
}

/// `GET /bookings/paginated`
#[derive(Debug, Deserialize)]
pub struct BookingPageQuery {
    #[serde(default = "default_page_number")]
    pub page_number: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    pub status: Option<String>,
    pub student_id: Option<i64>,
    pub tutor_id: Option<i64>,
}
