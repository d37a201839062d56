//! Booking handlers for the REST API.

use axum::extract::State;

use tutorhub_core::repository::booking::BookingFilter;
use tutorhub_types::booking::{Booking, BookingStatus, CreateBookingRequest, UpdateBookingRequest};
use tutorhub_types::id::{BookingId, StudentId, TutorId};
use tutorhub_types::page::{Page, PageRequest};

use crate::http::error::AppError;
use crate::http::extractors::ApiPath;
use crate::http::extractors::json::ValidatedJson;
use crate::http::extractors::query::{ApiQuery, BookingPageQuery};
use crate::http::response::{ApiResponse, Deleted, RequestContext};
use crate::state::AppState;

fn parse_status(raw: &str) -> Result<BookingStatus, AppError> {
    raw.parse::<BookingStatus>().map_err(AppError::Validation)
}

/// GET /api/v1/bookings - Newest first.
pub async fn list_bookings(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<ApiResponse<Vec<Booking>>, AppError> {
    let bookings = state.booking_service.list().await?;
    Ok(ctx.ok(bookings).with_link("self", "/api/v1/bookings"))
}

/// POST /api/v1/bookings - Book a slot. The new booking is `pending`.
pub async fn create_booking(
    State(state): State<AppState>,
    ctx: RequestContext,
    ValidatedJson(body): ValidatedJson<CreateBookingRequest>,
) -> Result<ApiResponse<Booking>, AppError> {
    let booking = state.booking_service.create(body).await?;
    let href = format!("/api/v1/bookings/{}", booking.id);
    let slot = format!("/api/v1/schedules/{}", booking.schedule_id);
    Ok(ctx
        .ok(booking)
        .created()
        .with_link("self", &href)
        .with_link("schedule", &slot))
}

/// GET /api/v1/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Booking>, AppError> {
    let booking = state.booking_service.get(BookingId(id)).await?;
    Ok(ctx.ok(booking))
}

/// PUT /api/v1/bookings/{id} - Move the booking to `{status}`.
pub async fn update_booking(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(body): ValidatedJson<UpdateBookingRequest>,
) -> Result<ApiResponse<Booking>, AppError> {
    let booking = state
        .booking_service
        .update_status(BookingId(id), body.status)
        .await?;
    Ok(ctx.ok(booking))
}

/// DELETE /api/v1/bookings/{id} - Also removes its review and frees the slot.
pub async fn delete_booking(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Deleted>, AppError> {
    state.booking_service.delete(BookingId(id)).await?;
    Ok(ctx.ok(Deleted::new(id)))
}

/// GET /api/v1/bookings/student/{id}
pub async fn bookings_by_student(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Vec<Booking>>, AppError> {
    let bookings = state.booking_service.by_student(StudentId(id)).await?;
    Ok(ctx.ok(bookings))
}

/// GET /api/v1/bookings/tutor/{id}
pub async fn bookings_by_tutor(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Vec<Booking>>, AppError> {
    let bookings = state.booking_service.by_tutor(TutorId(id)).await?;
    Ok(ctx.ok(bookings))
}

/// GET /api/v1/bookings/status/{status}
pub async fn bookings_by_status(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(status): ApiPath<String>,
) -> Result<ApiResponse<Vec<Booking>>, AppError> {
    let status = parse_status(&status)?;
    let bookings = state.booking_service.by_status(status).await?;
    Ok(ctx.ok(bookings))
}

/// GET /api/v1/bookings/paginated
pub async fn paginated_bookings(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiQuery(query): ApiQuery<BookingPageQuery>,
) -> Result<ApiResponse<Page<Booking>>, AppError> {
    let page = PageRequest::new(query.page_number, query.page_size)?;
    let filter = BookingFilter {
        status: query.status.as_deref().map(parse_status).transpose()?,
        student_id: query.student_id.map(StudentId),
        tutor_id: query.tutor_id.map(TutorId),
    };
    let bookings = state.booking_service.paginated(page, filter).await?;
    Ok(ctx.ok(bookings))
}
