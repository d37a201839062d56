//! Subject handlers for the REST API.

use axum::extract::State;

use tutorhub_types::catalog::{Subject, SubjectRequest};
use tutorhub_types::id::SubjectId;

use crate::http::error::AppError;
use crate::http::extractors::ApiPath;
use crate::http::extractors::json::ValidatedJson;
use crate::http::response::{ApiResponse, Deleted, RequestContext};
use crate::state::AppState;

/// GET /api/v1/subjects
pub async fn list_subjects(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<ApiResponse<Vec<Subject>>, AppError> {
    let subjects = state.subject_service.list().await?;
    Ok(ctx.ok(subjects).with_link("self", "/api/v1/subjects"))
}

/// POST /api/v1/subjects
pub async fn create_subject(
    State(state): State<AppState>,
    ctx: RequestContext,
    ValidatedJson(body): ValidatedJson<SubjectRequest>,
) -> Result<ApiResponse<Subject>, AppError> {
    let subject = state.subject_service.create(body).await?;
    let href = format!("/api/v1/subjects/{}", subject.id);
    Ok(ctx.ok(subject).created().with_link("self", &href))
}

/// GET /api/v1/subjects/{id}
pub async fn get_subject(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Subject>, AppError> {
    let subject = state.subject_service.get(SubjectId(id)).await?;
    Ok(ctx.ok(subject))
}

/// PUT /api/v1/subjects/{id}
pub async fn update_subject(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(body): ValidatedJson<SubjectRequest>,
) -> Result<ApiResponse<Subject>, AppError> {
    let subject = state.subject_service.update(SubjectId(id), body).await?;
    Ok(ctx.ok(subject))
}

/// DELETE /api/v1/subjects/{id}
pub async fn delete_subject(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Deleted>, AppError> {
    state.subject_service.delete(SubjectId(id)).await?;
    Ok(ctx.ok(Deleted::new(id)))
}

/// GET /api/v1/subjects/name/{name}
pub async fn subject_by_name(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(name): ApiPath<String>,
) -> Result<ApiResponse<Subject>, AppError> {
    let subject = state.subject_service.by_name(&name).await?;
    Ok(ctx.ok(subject))
}

/// GET /api/v1/subjects/category/{category}
pub async fn subjects_by_category(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(category): ApiPath<String>,
) -> Result<ApiResponse<Vec<Subject>>, AppError> {
    let subjects = state.subject_service.by_category(&category).await?;
    Ok(ctx.ok(subjects))
}
