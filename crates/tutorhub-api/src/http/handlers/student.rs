//! Student handlers for the REST API.

use axum::extract::State;

use tutorhub_core::repository::student::StudentFilter;
use tutorhub_types::account::{CreateStudentRequest, Student, UpdateStudentRequest};
use tutorhub_types::id::{CityId, StudentId};
use tutorhub_types::page::{Page, PageRequest};

use crate::http::error::AppError;
use crate::http::extractors::ApiPath;
use crate::http::extractors::json::ValidatedJson;
use crate::http::extractors::query::{ApiQuery, StudentPageQuery};
use crate::http::response::{ApiResponse, Deleted, RequestContext};
use crate::state::AppState;

/// GET /api/v1/students
pub async fn list_students(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<ApiResponse<Vec<Student>>, AppError> {
    let students = state.student_service.list().await?;
    Ok(ctx.ok(students).with_link("self", "/api/v1/students"))
}

/// POST /api/v1/students - Register a student account.
pub async fn create_student(
    State(state): State<AppState>,
    ctx: RequestContext,
    ValidatedJson(body): ValidatedJson<CreateStudentRequest>,
) -> Result<ApiResponse<Student>, AppError> {
    let student = state.student_service.create(body).await?;
    let href = format!("/api/v1/students/{}", student.id);
    let bookings = format!("/api/v1/bookings/student/{}", student.id);
    Ok(ctx
        .ok(student)
        .created()
        .with_link("self", &href)
        .with_link("bookings", &bookings))
}

/// GET /api/v1/students/{id}
pub async fn get_student(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Student>, AppError> {
    let student = state.student_service.get(StudentId(id)).await?;
    Ok(ctx.ok(student))
}

/// PUT /api/v1/students/{id}
pub async fn update_student(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(body): ValidatedJson<UpdateStudentRequest>,
) -> Result<ApiResponse<Student>, AppError> {
    let student = state.student_service.update(StudentId(id), body).await?;
    Ok(ctx.ok(student))
}

/// DELETE /api/v1/students/{id}
pub async fn delete_student(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Deleted>, AppError> {
    state.student_service.delete(StudentId(id)).await?;
    Ok(ctx.ok(Deleted::new(id)))
}

/// GET /api/v1/students/city/{city_id}
pub async fn students_by_city(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(city_id): ApiPath<i64>,
) -> Result<ApiResponse<Vec<Student>>, AppError> {
    let students = state.student_service.by_city(CityId(city_id)).await?;
    Ok(ctx.ok(students))
}

/// GET /api/v1/students/paginated
pub async fn paginated_students(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiQuery(query): ApiQuery<StudentPageQuery>,
) -> Result<ApiResponse<Page<Student>>, AppError> {
    let page = PageRequest::new(query.page_number, query.page_size)?;
    let filter = StudentFilter {
        city_id: query.city_id.map(CityId),
        school_grade: query.school_grade,
    };
    let students = state.student_service.paginated(page, filter).await?;
    Ok(ctx.ok(students))
}
