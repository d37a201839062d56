//! Tutor handlers for the REST API.

use axum::extract::State;

use tutorhub_core::repository::tutor::TutorSort;
use tutorhub_types::account::{
    CreateTutorRequest, Tutor, TutorRating, TutorSearchCriteria, UpdateTutorRequest,
};
use tutorhub_types::id::{CityId, TutorId};
use tutorhub_types::page::{Page, PageRequest};

use crate::http::error::AppError;
use crate::http::extractors::ApiPath;
use crate::http::extractors::json::ValidatedJson;
use crate::http::extractors::query::{ApiQuery, TutorPageQuery};
use crate::http::response::{ApiResponse, Deleted, RequestContext};
use crate::state::AppState;

/// GET /api/v1/tutors
pub async fn list_tutors(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<ApiResponse<Vec<Tutor>>, AppError> {
    let tutors = state.tutor_service.list().await?;
    Ok(ctx.ok(tutors).with_link("self", "/api/v1/tutors"))
}

/// POST /api/v1/tutors - Register a tutor account.
pub async fn create_tutor(
    State(state): State<AppState>,
    ctx: RequestContext,
    ValidatedJson(body): ValidatedJson<CreateTutorRequest>,
) -> Result<ApiResponse<Tutor>, AppError> {
    let tutor = state.tutor_service.create(body).await?;
    let href = format!("/api/v1/tutors/{}", tutor.id);
    let schedules = format!("/api/v1/schedules/tutor/{}", tutor.id);
    let subjects = format!("/api/v1/tutor-subjects/tutor/{}", tutor.id);
    Ok(ctx
        .ok(tutor)
        .created()
        .with_link("self", &href)
        .with_link("schedules", &schedules)
        .with_link("subjects", &subjects))
}

/// GET /api/v1/tutors/{id}
pub async fn get_tutor(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Tutor>, AppError> {
    let tutor = state.tutor_service.get(TutorId(id)).await?;
    Ok(ctx.ok(tutor))
}

/// PUT /api/v1/tutors/{id}
pub async fn update_tutor(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(body): ValidatedJson<UpdateTutorRequest>,
) -> Result<ApiResponse<Tutor>, AppError> {
    let tutor = state.tutor_service.update(TutorId(id), body).await?;
    Ok(ctx.ok(tutor))
}

/// DELETE /api/v1/tutors/{id} - Removes the tutor with their schedules,
/// offers and bookings.
pub async fn delete_tutor(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Deleted>, AppError> {
    state.tutor_service.delete(TutorId(id)).await?;
    Ok(ctx.ok(Deleted::new(id)))
}

/// GET /api/v1/tutors/city/{city_id}
pub async fn tutors_by_city(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(city_id): ApiPath<i64>,
) -> Result<ApiResponse<Vec<Tutor>>, AppError> {
    let tutors = state.tutor_service.by_city(CityId(city_id)).await?;
    Ok(ctx.ok(tutors))
}

/// GET /api/v1/tutors/paginated
pub async fn paginated_tutors(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiQuery(query): ApiQuery<TutorPageQuery>,
) -> Result<ApiResponse<Page<Tutor>>, AppError> {
    let page = PageRequest::new(query.page_number, query.page_size)?;
    let sort = match query.sort_by.as_deref() {
        Some(field) => field.parse::<TutorSort>().map_err(AppError::Validation)?,
        None => TutorSort::default(),
    };
    let tutors = state
        .tutor_service
        .paginated(page, sort, query.descending)
        .await?;
    Ok(ctx.ok(tutors))
}

/// POST /api/v1/tutors/search
pub async fn search_tutors(
    State(state): State<AppState>,
    ctx: RequestContext,
    ValidatedJson(criteria): ValidatedJson<TutorSearchCriteria>,
) -> Result<ApiResponse<Vec<Tutor>>, AppError> {
    let tutors = state.tutor_service.search(&criteria).await?;
    Ok(ctx.ok(tutors))
}

/// GET /api/v1/tutors/top-rated/{count}
pub async fn top_rated_tutors(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(count): ApiPath<i64>,
) -> Result<ApiResponse<Vec<TutorRating>>, AppError> {
    let tutors = state.tutor_service.top_rated(count).await?;
    Ok(ctx.ok(tutors))
}
