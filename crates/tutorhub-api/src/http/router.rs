//! Axum router configuration with middleware.
//!
//! All resource routes are under `/api/v1/`, plus `GET /health`.
//! Middleware: CORS, request tracing.
//!
//! Literal segments (`/paginated`, `/name/{name}`, `/ordered-by-position`)
//! sit next to `/{id}`; the matcher prefers static segments, so they never
//! reach the id handlers.

use axum::Router;
use axum::routing::{get, patch, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::http::response::{ApiResponse, RequestContext};
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .merge(catalog_routes())
        .merge(account_routes())
        .merge(booking_routes());

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Cities, subjects, teaching levels and tutor offers.
fn catalog_routes() -> Router<AppState> {
    use handlers::{city, subject, teaching_level, tutor_subject};

    Router::new()
        // Cities
        .route("/cities", get(city::list_cities).post(city::create_city))
        .route(
            "/cities/{id}",
            get(city::get_city)
                .put(city::update_city)
                .delete(city::delete_city),
        )
        .route("/cities/name/{name}", get(city::city_by_name))
        .route("/cities/country/{country}", get(city::cities_by_country))
        // Subjects
        .route(
            "/subjects",
            get(subject::list_subjects).post(subject::create_subject),
        )
        .route(
            "/subjects/{id}",
            get(subject::get_subject)
                .put(subject::update_subject)
                .delete(subject::delete_subject),
        )
        .route("/subjects/name/{name}", get(subject::subject_by_name))
        .route(
            "/subjects/category/{category}",
            get(subject::subjects_by_category),
        )
        // Teaching levels
        .route(
            "/teaching-levels",
            get(teaching_level::list_levels).post(teaching_level::create_level),
        )
        .route(
            "/teaching-levels/ordered-by-position",
            get(teaching_level::levels_by_position),
        )
        .route(
            "/teaching-levels/{id}",
            get(teaching_level::get_level)
                .put(teaching_level::update_level)
                .delete(teaching_level::delete_level),
        )
        .route(
            "/teaching-levels/name/{name}",
            get(teaching_level::level_by_name),
        )
        .route(
            "/teaching-levels/position/{position}",
            get(teaching_level::level_by_position),
        )
        // Tutor subjects
        .route(
            "/tutor-subjects",
            get(tutor_subject::list_offers).post(tutor_subject::create_offer),
        )
        .route(
            "/tutor-subjects/pricing-statistics",
            get(tutor_subject::pricing_statistics),
        )
        .route(
            "/tutor-subjects/{id}",
            get(tutor_subject::get_offer)
                .put(tutor_subject::update_offer)
                .delete(tutor_subject::delete_offer),
        )
        .route(
            "/tutor-subjects/tutor/{id}",
            get(tutor_subject::offers_by_tutor),
        )
        .route(
            "/tutor-subjects/subject/{id}",
            get(tutor_subject::offers_by_subject),
        )
        .route(
            "/tutor-subjects/level/{id}",
            get(tutor_subject::offers_by_level),
        )
}

/// Students and tutors.
fn account_routes() -> Router<AppState> {
    use handlers::{student, tutor};

    Router::new()
        // Students
        .route(
            "/students",
            get(student::list_students).post(student::create_student),
        )
        .route("/students/paginated", get(student::paginated_students))
        .route(
            "/students/{id}",
            get(student::get_student)
                .put(student::update_student)
                .delete(student::delete_student),
        )
        .route("/students/city/{city_id}", get(student::students_by_city))
        // Tutors
        .route("/tutors", get(tutor::list_tutors).post(tutor::create_tutor))
        .route("/tutors/paginated", get(tutor::paginated_tutors))
        .route("/tutors/search", post(tutor::search_tutors))
        .route("/tutors/top-rated/{count}", get(tutor::top_rated_tutors))
        .route(
            "/tutors/{id}",
            get(tutor::get_tutor)
                .put(tutor::update_tutor)
                .delete(tutor::delete_tutor),
        )
        .route("/tutors/city/{city_id}", get(tutor::tutors_by_city))
}

/// Schedule slots, bookings and reviews.
fn booking_routes() -> Router<AppState> {
    use handlers::{booking, review, schedule};

    Router::new()
        // Schedules
        .route(
            "/schedules",
            get(schedule::list_schedules).post(schedule::create_schedule),
        )
        .route(
            "/schedules/{id}",
            get(schedule::get_schedule)
                .put(schedule::update_schedule)
                .delete(schedule::delete_schedule),
        )
        .route(
            "/schedules/{id}/unavailable",
            patch(schedule::mark_unavailable),
        )
        .route("/schedules/{id}/available", patch(schedule::mark_available))
        .route("/schedules/tutor/{id}", get(schedule::schedules_by_tutor))
        .route(
            "/schedules/tutor/{id}/available",
            get(schedule::available_by_tutor),
        )
        .route(
            "/schedules/tutor/{id}/date/{date}",
            get(schedule::schedules_by_tutor_and_date),
        )
        // Bookings
        .route(
            "/bookings",
            get(booking::list_bookings).post(booking::create_booking),
        )
        .route("/bookings/paginated", get(booking::paginated_bookings))
        .route(
            "/bookings/{id}",
            get(booking::get_booking)
                .put(booking::update_booking)
                .delete(booking::delete_booking),
        )
        .route(
            "/bookings/student/{id}",
            get(booking::bookings_by_student),
        )
        .route("/bookings/tutor/{id}", get(booking::bookings_by_tutor))
        .route(
            "/bookings/status/{status}",
            get(booking::bookings_by_status),
        )
        // Reviews
        .route(
            "/reviews",
            get(review::list_reviews).post(review::create_review),
        )
        .route(
            "/reviews/{id}",
            get(review::get_review)
                .put(review::update_review)
                .delete(review::delete_review),
        )
        .route("/reviews/booking/{id}", get(review::review_by_booking))
        .route("/reviews/student/{id}", get(review::reviews_by_student))
        .route("/reviews/tutor/{id}", get(review::reviews_by_tutor))
        .route("/reviews/rating/{rating}", get(review::reviews_by_rating))
}

#[derive(serde::Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

/// GET /health - Liveness probe in the standard envelope.
async fn health_check(ctx: RequestContext) -> ApiResponse<Health> {
    ctx.ok(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use tutorhub_infra::sqlite::pool::{DatabasePool, database_url};

    async fn test_router() -> Router {
        let dir = tempfile::tempdir().unwrap();
        let url = database_url(dir.path(), "api.db");
        let data_dir = dir.path().to_path_buf();
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        let pool = DatabasePool::new(&url).await.unwrap();
        build_router(AppState::with_pool(pool, data_dir))
    }

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn error_code(body: &Value) -> &str {
        body["errors"][0]["code"].as_str().unwrap()
    }

    fn user(email: &str, user_type: &str) -> Value {
        json!({
            "first_name": "Тарас",
            "last_name": "Бондар",
            "email": email,
            "user_type": user_type,
        })
    }

    #[tokio::test]
    async fn test_health_uses_envelope() {
        let router = test_router().await;
        let (status, body) = send(&router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "ok");
        assert!(body["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_create_city_returns_201_with_link() {
        let router = test_router().await;
        let (status, body) = send(
            &router,
            Method::POST,
            "/api/v1/cities",
            Some(json!({"name": "Львів", "region": "Львівська"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["name"], "Львів");
        assert_eq!(body["data"]["country"], "Україна");
        let id = body["data"]["id"].as_i64().unwrap();
        assert_eq!(body["_links"]["self"], format!("/api/v1/cities/{id}"));

        let (status, body) = send(
            &router,
            Method::POST,
            "/api/v1/cities",
            Some(json!({"name": "Львів", "region": "Львівська"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(error_code(&body), "CONFLICT");
    }

    #[tokio::test]
    async fn test_missing_resource_is_404_envelope() {
        let router = test_router().await;
        let (status, body) = send(&router, Method::GET, "/api/v1/tutors/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_code(&body), "NOT_FOUND");
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_malformed_input_is_validation_error() {
        let router = test_router().await;

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/subjects")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(error_code(&body), "VALIDATION_ERROR");

        let (status, body) = send(&router, Method::GET, "/api/v1/cities/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "VALIDATION_ERROR");

        let (status, body) = send(
            &router,
            Method::GET,
            "/api/v1/bookings/status/archived",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "VALIDATION_ERROR");

        let (status, body) = send(
            &router,
            Method::POST,
            "/api/v1/subjects",
            Some(json!({"name": "", "category": "STEM"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_static_segments_win_over_id() {
        let router = test_router().await;
        for (name, position) in [("Старша школа", 2), ("Початкова школа", 1)] {
            let (status, _) = send(
                &router,
                Method::POST,
                "/api/v1/teaching-levels",
                Some(json!({"name": name, "position": position})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(
            &router,
            Method::GET,
            "/api/v1/teaching-levels/ordered-by-position",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["name"], "Початкова школа");

        let (status, body) = send(
            &router,
            Method::GET,
            "/api/v1/students/paginated?page_number=1&page_size=5",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total_count"], 0);
    }

    #[tokio::test]
    async fn test_booking_flow() {
        let router = test_router().await;

        let (_, subject) = send(
            &router,
            Method::POST,
            "/api/v1/subjects",
            Some(json!({"name": "Математика", "category": "STEM"})),
        )
        .await;
        let (_, level) = send(
            &router,
            Method::POST,
            "/api/v1/teaching-levels",
            Some(json!({"name": "ЗНО", "position": 1})),
        )
        .await;

        let tutor_body = json!({
            "user": user("tutor@example.com", "tutor"),
            "years_experience": 7,
            "education": "KNU, Mathematics",
            "online_available": true,
        });
        let (status, tutor) =
            send(&router, Method::POST, "/api/v1/tutors", Some(tutor_body)).await;
        assert_eq!(status, StatusCode::CREATED);
        let tutor_id = tutor["data"]["id"].as_i64().unwrap();

        let (status, offer) = send(
            &router,
            Method::POST,
            "/api/v1/tutor-subjects",
            Some(json!({
                "tutor_id": tutor_id,
                "subject_id": subject["data"]["id"],
                "level_id": level["data"]["id"],
                "hourly_rate": 450.0,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, slot) = send(
            &router,
            Method::POST,
            "/api/v1/schedules",
            Some(json!({
                "tutor_id": tutor_id,
                "date": "2030-01-10",
                "start_time": "10:00:00",
                "end_time": "11:00:00",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let slot_id = slot["data"]["id"].as_i64().unwrap();

        let (status, student) = send(
            &router,
            Method::POST,
            "/api/v1/students",
            Some(json!({"user": user("student@example.com", "student"), "school_grade": 11})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let booking_body = json!({
            "student_id": student["data"]["id"],
            "tutor_subject_id": offer["data"]["id"],
            "schedule_id": slot_id,
            "format": "online",
        });
        let (status, booking) = send(
            &router,
            Method::POST,
            "/api/v1/bookings",
            Some(booking_body.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(booking["data"]["status"], "pending");
        let booking_id = booking["data"]["id"].as_i64().unwrap();

        let (status, body) =
            send(&router, Method::POST, "/api/v1/bookings", Some(booking_body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(error_code(&body), "CONFLICT");

        let (status, body) = send(
            &router,
            Method::GET,
            &format!("/api/v1/schedules/tutor/{tutor_id}/available"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 0);

        let (status, body) = send(
            &router,
            Method::PUT,
            &format!("/api/v1/bookings/{booking_id}"),
            Some(json!({"status": "confirmed"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "confirmed");

        let (status, body) = send(
            &router,
            Method::DELETE,
            &format!("/api/v1/schedules/{slot_id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "BUSINESS_RULE");

        let (status, body) = send(
            &router,
            Method::DELETE,
            &format!("/api/v1/bookings/{booking_id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["deleted"], true);
        assert_eq!(body["data"]["id"], booking_id);
    }
}
