//! City handlers for the REST API.

use axum::extract::State;

use tutorhub_types::city::{City, CityRequest};
use tutorhub_types::id::CityId;

use crate::http::error::AppError;
use crate::http::extractors::ApiPath;
use crate::http::extractors::json::ValidatedJson;
use crate::http::response::{ApiResponse, Deleted, RequestContext};
use crate::state::AppState;

/// GET /api/v1/cities
pub async fn list_cities(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<ApiResponse<Vec<City>>, AppError> {
    let cities = state.city_service.list().await?;
    Ok(ctx.ok(cities).with_link("self", "/api/v1/cities"))
}

/// POST /api/v1/cities
pub async fn create_city(
    State(state): State<AppState>,
    ctx: RequestContext,
    ValidatedJson(body): ValidatedJson<CityRequest>,
) -> Result<ApiResponse<City>, AppError> {
    let city = state.city_service.create(body).await?;
    let href = format!("/api/v1/cities/{}", city.id);
    Ok(ctx.ok(city).created().with_link("self", &href))
}

/// GET /api/v1/cities/{id}
pub async fn get_city(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<City>, AppError> {
    let city = state.city_service.get(CityId(id)).await?;
    Ok(ctx.ok(city))
}

/// PUT /api/v1/cities/{id}
pub async fn update_city(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(body): ValidatedJson<CityRequest>,
) -> Result<ApiResponse<City>, AppError> {
    let city = state.city_service.update(CityId(id), body).await?;
    Ok(ctx.ok(city))
}

/// DELETE /api/v1/cities/{id}
pub async fn delete_city(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Deleted>, AppError> {
    state.city_service.delete(CityId(id)).await?;
    Ok(ctx.ok(Deleted::new(id)))
}

/// GET /api/v1/cities/name/{name}
pub async fn city_by_name(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(name): ApiPath<String>,
) -> Result<ApiResponse<City>, AppError> {
    let city = state.city_service.by_name(&name).await?;
    Ok(ctx.ok(city))
}

/// GET /api/v1/cities/country/{country}
pub async fn cities_by_country(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(country): ApiPath<String>,
) -> Result<ApiResponse<Vec<City>>, AppError> {
    let cities = state.city_service.by_country(&country).await?;
    Ok(ctx.ok(cities))
}
