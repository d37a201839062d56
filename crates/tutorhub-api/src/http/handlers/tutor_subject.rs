//! Tutor subject (offer) handlers for the REST API.

use axum::extract::State;

use tutorhub_types::id::{LevelId, SubjectId, TutorId, TutorSubjectId};
use tutorhub_types::tutor_subject::{
    CreateTutorSubjectRequest, TutorPricing, TutorSubject, UpdateTutorSubjectRequest,
};

use crate::http::error::AppError;
use crate::http::extractors::ApiPath;
use crate::http::extractors::json::ValidatedJson;
use crate::http::response::{ApiResponse, Deleted, RequestContext};
use crate::state::AppState;

/// GET /api/v1/tutor-subjects
pub async fn list_offers(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<ApiResponse<Vec<TutorSubject>>, AppError> {
    let offers = state.tutor_subject_service.list().await?;
    Ok(ctx.ok(offers).with_link("self", "/api/v1/tutor-subjects"))
}

/// POST /api/v1/tutor-subjects
pub async fn create_offer(
    State(state): State<AppState>,
    ctx: RequestContext,
    ValidatedJson(body): ValidatedJson<CreateTutorSubjectRequest>,
) -> Result<ApiResponse<TutorSubject>, AppError> {
    let offer = state.tutor_subject_service.create(body).await?;
    let href = format!("/api/v1/tutor-subjects/{}", offer.id);
    let tutor = format!("/api/v1/tutors/{}", offer.tutor_id);
    Ok(ctx
        .ok(offer)
        .created()
        .with_link("self", &href)
        .with_link("tutor", &tutor))
}

/// GET /api/v1/tutor-subjects/{id}
pub async fn get_offer(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<TutorSubject>, AppError> {
    let offer = state.tutor_subject_service.get(TutorSubjectId(id)).await?;
    Ok(ctx.ok(offer))
}

/// PUT /api/v1/tutor-subjects/{id} - Change the hourly rate.
pub async fn update_offer(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(body): ValidatedJson<UpdateTutorSubjectRequest>,
) -> Result<ApiResponse<TutorSubject>, AppError> {
    let offer = state
        .tutor_subject_service
        .update(TutorSubjectId(id), body)
        .await?;
    Ok(ctx.ok(offer))
}

/// DELETE /api/v1/tutor-subjects/{id}
pub async fn delete_offer(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Deleted>, AppError> {
    state.tutor_subject_service.delete(TutorSubjectId(id)).await?;
    Ok(ctx.ok(Deleted::new(id)))
}

/// GET /api/v1/tutor-subjects/tutor/{id}
pub async fn offers_by_tutor(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Vec<TutorSubject>>, AppError> {
    let offers = state.tutor_subject_service.by_tutor(TutorId(id)).await?;
    Ok(ctx.ok(offers))
}

/// GET /api/v1/tutor-subjects/subject/{id}
pub async fn offers_by_subject(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Vec<TutorSubject>>, AppError> {
    let offers = state.tutor_subject_service.by_subject(SubjectId(id)).await?;
    Ok(ctx.ok(offers))
}

/// GET /api/v1/tutor-subjects/level/{id}
pub async fn offers_by_level(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Vec<TutorSubject>>, AppError> {
    let offers = state.tutor_subject_service.by_level(LevelId(id)).await?;
    Ok(ctx.ok(offers))
}

/// GET /api/v1/tutor-subjects/pricing-statistics
pub async fn pricing_statistics(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<ApiResponse<Vec<TutorPricing>>, AppError> {
    let stats = state.tutor_subject_service.pricing_statistics().await?;
    Ok(ctx.ok(stats))
}
