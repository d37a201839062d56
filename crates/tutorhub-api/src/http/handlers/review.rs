//! Review handlers for the REST API.

use axum::extract::State;

use tutorhub_types::id::{BookingId, ReviewId, StudentId, TutorId};
use tutorhub_types::review::{CreateReviewRequest, Review, UpdateReviewRequest};

use crate::http::error::AppError;
use crate::http::extractors::ApiPath;
use crate::http::extractors::json::ValidatedJson;
use crate::http::response::{ApiResponse, Deleted, RequestContext};
use crate::state::AppState;

/// GET /api/v1/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<ApiResponse<Vec<Review>>, AppError> {
    let reviews = state.review_service.list().await?;
    Ok(ctx.ok(reviews).with_link("self", "/api/v1/reviews"))
}

/// POST /api/v1/reviews - Review a completed, past session.
pub async fn create_review(
    State(state): State<AppState>,
    ctx: RequestContext,
    ValidatedJson(body): ValidatedJson<CreateReviewRequest>,
) -> Result<ApiResponse<Review>, AppError> {
    let review = state.review_service.create(body).await?;
    let href = format!("/api/v1/reviews/{}", review.id);
    let booking = format!("/api/v1/bookings/{}", review.booking_id);
    Ok(ctx
        .ok(review)
        .created()
        .with_link("self", &href)
        .with_link("booking", &booking))
}

/// GET /api/v1/reviews/{id}
pub async fn get_review(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Review>, AppError> {
    let review = state.review_service.get(ReviewId(id)).await?;
    Ok(ctx.ok(review))
}

/// PUT /api/v1/reviews/{id}
pub async fn update_review(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(body): ValidatedJson<UpdateReviewRequest>,
) -> Result<ApiResponse<Review>, AppError> {
    let review = state.review_service.update(ReviewId(id), body).await?;
    Ok(ctx.ok(review))
}

/// DELETE /api/v1/reviews/{id}
pub async fn delete_review(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Deleted>, AppError> {
    state.review_service.delete(ReviewId(id)).await?;
    Ok(ctx.ok(Deleted::new(id)))
}

/// GET /api/v1/reviews/booking/{id}
pub async fn review_by_booking(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Review>, AppError> {
    let review = state.review_service.by_booking(BookingId(id)).await?;
    Ok(ctx.ok(review))
}

/// GET /api/v1/reviews/student/{id}
pub async fn reviews_by_student(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Vec<Review>>, AppError> {
    let reviews = state.review_service.by_student(StudentId(id)).await?;
    Ok(ctx.ok(reviews))
}

/// GET /api/v1/reviews/tutor/{id}
pub async fn reviews_by_tutor(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Vec<Review>>, AppError> {
    let reviews = state.review_service.by_tutor(TutorId(id)).await?;
    Ok(ctx.ok(reviews))
}

/// GET /api/v1/reviews/rating/{rating}
pub async fn reviews_by_rating(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(rating): ApiPath<i64>,
) -> Result<ApiResponse<Vec<Review>>, AppError> {
    let reviews = state.review_service.by_rating(rating).await?;
    Ok(ctx.ok(reviews))
}
