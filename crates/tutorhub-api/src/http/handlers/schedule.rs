//! Schedule slot handlers for the REST API.

use axum::extract::State;
use chrono::NaiveDate;

use tutorhub_types::id::{ScheduleId, TutorId};
use tutorhub_types::schedule::{CreateScheduleRequest, Schedule, UpdateScheduleRequest};

use crate::http::error::AppError;
use crate::http::extractors::ApiPath;
use crate::http::extractors::json::ValidatedJson;
use crate::http::response::{ApiResponse, Deleted, RequestContext};
use crate::state::AppState;

/// GET /api/v1/schedules
pub async fn list_schedules(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<ApiResponse<Vec<Schedule>>, AppError> {
    let slots = state.schedule_service.list().await?;
    Ok(ctx.ok(slots).with_link("self", "/api/v1/schedules"))
}

/// POST /api/v1/schedules - Publish a one-hour slot.
pub async fn create_schedule(
    State(state): State<AppState>,
    ctx: RequestContext,
    ValidatedJson(body): ValidatedJson<CreateScheduleRequest>,
) -> Result<ApiResponse<Schedule>, AppError> {
    let slot = state.schedule_service.create(body).await?;
    let href = format!("/api/v1/schedules/{}", slot.id);
    Ok(ctx.ok(slot).created().with_link("self", &href))
}

/// GET /api/v1/schedules/{id}
pub async fn get_schedule(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Schedule>, AppError> {
    let slot = state.schedule_service.get(ScheduleId(id)).await?;
    Ok(ctx.ok(slot))
}

/// PUT /api/v1/schedules/{id}
pub async fn update_schedule(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(body): ValidatedJson<UpdateScheduleRequest>,
) -> Result<ApiResponse<Schedule>, AppError> {
    let slot = state.schedule_service.update(ScheduleId(id), body).await?;
    Ok(ctx.ok(slot))
}

/// DELETE /api/v1/schedules/{id}
pub async fn delete_schedule(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Deleted>, AppError> {
    state.schedule_service.delete(ScheduleId(id)).await?;
    Ok(ctx.ok(Deleted::new(id)))
}

/// GET /api/v1/schedules/tutor/{id}
pub async fn schedules_by_tutor(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Vec<Schedule>>, AppError> {
    let slots = state.schedule_service.by_tutor(TutorId(id)).await?;
    Ok(ctx.ok(slots))
}

/// GET /api/v1/schedules/tutor/{id}/available - Open slots from today on.
pub async fn available_by_tutor(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Vec<Schedule>>, AppError> {
    let slots = state.schedule_service.available_by_tutor(TutorId(id)).await?;
    Ok(ctx.ok(slots))
}

/// GET /api/v1/schedules/tutor/{id}/date/{date}
pub async fn schedules_by_tutor_and_date(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath((id, date)): ApiPath<(i64, NaiveDate)>,
) -> Result<ApiResponse<Vec<Schedule>>, AppError> {
    let slots = state
        .schedule_service
        .by_tutor_and_date(TutorId(id), date)
        .await?;
    Ok(ctx.ok(slots))
}

/// PATCH /api/v1/schedules/{id}/unavailable
pub async fn mark_unavailable(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Schedule>, AppError> {
    let slot = state.schedule_service.mark_unavailable(ScheduleId(id)).await?;
    Ok(ctx.ok(slot))
}

/// PATCH /api/v1/schedules/{id}/available
pub async fn mark_available(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Schedule>, AppError> {
    let slot = state.schedule_service.mark_available(ScheduleId(id)).await?;
    Ok(ctx.ok(slot))
}
