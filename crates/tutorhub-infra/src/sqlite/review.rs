//! SQLite review repository implementation.

use chrono::{DateTime, Utc};
use sqlx::Row;
use tutorhub_core::repository::review::ReviewRepository;
use tutorhub_types::error::RepositoryError;
use tutorhub_types::id::{BookingId, ReviewId, StudentId, TutorId};
use tutorhub_types::review::{CreateReviewRequest, Review, UpdateReviewRequest};

use super::pool::DatabasePool;
use super::{format_datetime, is_unique_violation, parse_datetime, query_err};

/// SQLite-backed implementation of `ReviewRepository`.
pub struct SqliteReviewRepository {
    pool: DatabasePool,
}

impl SqliteReviewRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn fetch_all(&self, sql: &str, value: i64) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query(sql)
            .bind(value)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        rows.iter().map(review_from_row).collect()
    }
}

fn review_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Review, RepositoryError> {
    let created: String = row.try_get("created_at").map_err(query_err)?;
    Ok(Review {
        id: ReviewId(row.try_get("id").map_err(query_err)?),
        booking_id: BookingId(row.try_get("booking_id").map_err(query_err)?),
        rating: row.try_get("rating").map_err(query_err)?,
        comment: row.try_get("comment").map_err(query_err)?,
        is_anonymous: row.try_get("is_anonymous").map_err(query_err)?,
        created_at: parse_datetime(&created)?,
    })
}

impl ReviewRepository for SqliteReviewRepository {
    async fn create(
        &self,
        request: &CreateReviewRequest,
        created_at: DateTime<Utc>,
    ) -> Result<Review, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO reviews (booking_id, rating, comment, is_anonymous, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(request.booking_id)
        .bind(request.rating)
        .bind(&request.comment)
        .bind(request.is_anonymous)
        .bind(format_datetime(&created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(done) => Ok(Review {
                id: ReviewId(done.last_insert_rowid()),
                booking_id: BookingId(request.booking_id),
                rating: request.rating,
                comment: request.comment.clone(),
                is_anonymous: request.is_anonymous,
                created_at,
            }),
            Err(e) if is_unique_violation(&e, Some("booking_id")) => Err(
                RepositoryError::Conflict("booking already has a review".to_string()),
            ),
            Err(e) => Err(query_err(e)),
        }
    }

    async fn get_by_id(&self, id: ReviewId) -> Result<Option<Review>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM reviews WHERE id = ?")
            .bind(id.get())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;
        row.as_ref().map(review_from_row).transpose()
    }

    async fn get_by_booking(&self, booking_id: BookingId) -> Result<Option<Review>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM reviews WHERE booking_id = ?")
            .bind(booking_id.get())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;
        row.as_ref().map(review_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM reviews ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        rows.iter().map(review_from_row).collect()
    }

    async fn list_by_student(&self, student_id: StudentId) -> Result<Vec<Review>, RepositoryError> {
        self.fetch_all(
            "SELECT r.* FROM reviews r JOIN bookings b ON b.id = r.booking_id
             WHERE b.student_id = ? ORDER BY r.created_at DESC, r.id DESC",
            student_id.get(),
        )
        .await
    }

    async fn list_by_tutor(&self, tutor_id: TutorId) -> Result<Vec<Review>, RepositoryError> {
        self.fetch_all(
            "SELECT r.* FROM reviews r
             JOIN bookings b ON b.id = r.booking_id
             JOIN schedules s ON s.id = b.schedule_id
             WHERE s.tutor_id = ? ORDER BY r.created_at DESC, r.id DESC",
            tutor_id.get(),
        )
        .await
    }

    async fn list_by_rating(&self, rating: i16) -> Result<Vec<Review>, RepositoryError> {
        self.fetch_all(
            "SELECT * FROM reviews WHERE rating = ? ORDER BY created_at DESC, id DESC",
            i64::from(rating),
        )
        .await
    }

    async fn update(
        &self,
        id: ReviewId,
        request: &UpdateReviewRequest,
    ) -> Result<Review, RepositoryError> {
        let done = sqlx::query(
            "UPDATE reviews SET rating = ?, comment = ?, is_anonymous = ? WHERE id = ?",
        )
        .bind(request.rating)
        .bind(&request.comment)
        .bind(request.is_anonymous)
        .bind(id.get())
        .execute(&self.pool.writer)
        .await
        .map_err(query_err)?;

        if done.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        self.get_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: ReviewId) -> Result<(), RepositoryError> {
        let done = sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool.writer)
            .await
            .map_err(query_err)?;

        if done.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
