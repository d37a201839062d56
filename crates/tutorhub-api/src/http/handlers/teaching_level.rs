//! Teaching level handlers for the REST API.

use axum::extract::State;

use tutorhub_types::catalog::{TeachingLevel, TeachingLevelRequest};
use tutorhub_types::id::LevelId;

use crate::http::error::AppError;
use crate::http::extractors::ApiPath;
use crate::http::extractors::json::ValidatedJson;
use crate::http::response::{ApiResponse, Deleted, RequestContext};
use crate::state::AppState;

/// GET /api/v1/teaching-levels
pub async fn list_levels(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<ApiResponse<Vec<TeachingLevel>>, AppError> {
    let levels = state.level_service.list().await?;
    Ok(ctx.ok(levels).with_link("self", "/api/v1/teaching-levels"))
}

/// POST /api/v1/teaching-levels
pub async fn create_level(
    State(state): State<AppState>,
    ctx: RequestContext,
    ValidatedJson(body): ValidatedJson<TeachingLevelRequest>,
) -> Result<ApiResponse<TeachingLevel>, AppError> {
    let level = state.level_service.create(body).await?;
    let href = format!("/api/v1/teaching-levels/{}", level.id);
    Ok(ctx.ok(level).created().with_link("self", &href))
}

/// GET /api/v1/teaching-levels/{id}
pub async fn get_level(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<TeachingLevel>, AppError> {
    let level = state.level_service.get(LevelId(id)).await?;
    Ok(ctx.ok(level))
}

/// PUT /api/v1/teaching-levels/{id}
pub async fn update_level(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(body): ValidatedJson<TeachingLevelRequest>,
) -> Result<ApiResponse<TeachingLevel>, AppError> {
    let level = state.level_service.update(LevelId(id), body).await?;
    Ok(ctx.ok(level))
}

/// DELETE /api/v1/teaching-levels/{id}
pub async fn delete_level(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Deleted>, AppError> {
    state.level_service.delete(LevelId(id)).await?;
    Ok(ctx.ok(Deleted::new(id)))
}

/// GET /api/v1/teaching-levels/name/{name}
pub async fn level_by_name(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(name): ApiPath<String>,
) -> Result<ApiResponse<TeachingLevel>, AppError> {
    let level = state.level_service.by_name(&name).await?;
    Ok(ctx.ok(level))
}

/// GET /api/v1/teaching-levels/position/{position}
pub async fn level_by_position(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(position): ApiPath<i32>,
) -> Result<ApiResponse<TeachingLevel>, AppError> {
    let level = state.level_service.by_position(position).await?;
    Ok(ctx.ok(level))
}

/// GET /api/v1/teaching-levels/ordered-by-position
pub async fn levels_by_position(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<ApiResponse<Vec<TeachingLevel>>, AppError> {
    let levels = state.level_service.ordered_by_position().await?;
    Ok(ctx.ok(levels))
}
