//! SQLite booking repository implementation.
//!
//! A slot moves between "available" and "claimed" only inside the writer
//! transactions here. The partial unique index `idx_bookings_live_slot`
//! backs the claim: at most one non-cancelled booking per schedule row.

use chrono::{NaiveDate, NaiveTime};
use sqlx::Row;
use tutorhub_core::repository::booking::{
    BookingFilter, BookingRepository, ClaimOutcome, NewBooking,
};
use tutorhub_types::booking::{Booking, BookingFormat, BookingStatus};
use tutorhub_types::error::RepositoryError;
use tutorhub_types::id::{BookingId, ScheduleId, StudentId, TutorId, TutorSubjectId};
use tutorhub_types::page::PageRequest;

use super::pool::DatabasePool;
use super::{format_date, format_datetime, format_time, is_unique_violation, parse_datetime, query_err};

const SELECT_BOOKINGS: &str = "SELECT b.* FROM bookings b";

const NEWEST_FIRST: &str = "ORDER BY b.created_at DESC, b.id DESC";

/// Same-day overlap with one of the student's pending or confirmed sessions.
const STUDENT_OVERLAP: &str = "SELECT EXISTS (
    SELECT 1 FROM bookings b JOIN schedules s ON s.id = b.schedule_id
    WHERE b.student_id = ?1 AND b.status IN ('pending', 'confirmed')
      AND s.date = ?2 AND s.start_time < ?4 AND s.end_time > ?3
)";

/// SQLite-backed implementation of `BookingRepository`.
pub struct SqliteBookingRepository {
    pool: DatabasePool,
}

impl SqliteBookingRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn fetch_all(&self, sql: &str, id: i64) -> Result<Vec<Booking>, RepositoryError> {
        let rows = sqlx::query(sql)
            .bind(id)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        rows.iter().map(booking_from_row).collect()
    }
}

fn booking_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Booking, RepositoryError> {
    let format: String = row.try_get("format").map_err(query_err)?;
    let status: String = row.try_get("status").map_err(query_err)?;
    let created: String = row.try_get("created_at").map_err(query_err)?;
    Ok(Booking {
        id: BookingId(row.try_get("id").map_err(query_err)?),
        student_id: StudentId(row.try_get("student_id").map_err(query_err)?),
        tutor_subject_id: TutorSubjectId(row.try_get("tutor_subject_id").map_err(query_err)?),
        schedule_id: ScheduleId(row.try_get("schedule_id").map_err(query_err)?),
        format: format
            .parse::<BookingFormat>()
            .map_err(RepositoryError::Query)?,
        status: status
            .parse::<BookingStatus>()
            .map_err(RepositoryError::Query)?,
        created_at: parse_datetime(&created)?,
    })
}

impl BookingRepository for SqliteBookingRepository {
    async fn claim_slot(&self, booking: &NewBooking) -> Result<ClaimOutcome, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        let claimed = sqlx::query(
            "UPDATE schedules SET is_available = 0 WHERE id = ? AND is_available = 1",
        )
        .bind(booking.schedule_id.get())
        .execute(&mut *tx)
        .await
        .map_err(query_err)?;
        if claimed.rows_affected() == 0 {
            return Ok(ClaimOutcome::SlotTaken);
        }

        let (date, start, end): (String, String, String) =
            sqlx::query_as("SELECT date, start_time, end_time FROM schedules WHERE id = ?")
                .bind(booking.schedule_id.get())
                .fetch_one(&mut *tx)
                .await
                .map_err(query_err)?;

        let (busy,): (bool,) = sqlx::query_as(STUDENT_OVERLAP)
            .bind(booking.student_id.get())
            .bind(&date)
            .bind(&start)
            .bind(&end)
            .fetch_one(&mut *tx)
            .await
            .map_err(query_err)?;
        if busy {
            return Ok(ClaimOutcome::StudentBusy);
        }

        let inserted = sqlx::query(
            "INSERT INTO bookings (student_id, tutor_subject_id, schedule_id, format, status, created_at)
             VALUES (?, ?, ?, ?, 'pending', ?)",
        )
        .bind(booking.student_id.get())
        .bind(booking.tutor_subject_id.get())
        .bind(booking.schedule_id.get())
        .bind(booking.format.to_string())
        .bind(format_datetime(&booking.created_at))
        .execute(&mut *tx)
        .await;

        let id = match inserted {
            Ok(done) => BookingId(done.last_insert_rowid()),
            Err(e) if is_unique_violation(&e, Some("schedule_id")) => {
                return Ok(ClaimOutcome::SlotTaken);
            }
            Err(e) => return Err(query_err(e)),
        };

        tx.commit().await.map_err(query_err)?;

        Ok(ClaimOutcome::Claimed(Booking {
            id,
            student_id: booking.student_id,
            tutor_subject_id: booking.tutor_subject_id,
            schedule_id: booking.schedule_id,
            format: booking.format,
            status: BookingStatus::Pending,
            created_at: booking.created_at,
        }))
    }

    async fn get_by_id(&self, id: BookingId) -> Result<Option<Booking>, RepositoryError> {
        let row = sqlx::query("SELECT b.* FROM bookings b WHERE b.id = ?")
            .bind(id.get())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;
        row.as_ref().map(booking_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<Booking>, RepositoryError> {
        let sql = format!("{SELECT_BOOKINGS} {NEWEST_FIRST}");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        rows.iter().map(booking_from_row).collect()
    }

    async fn list_by_student(&self, student_id: StudentId) -> Result<Vec<Booking>, RepositoryError> {
        let sql = format!("{SELECT_BOOKINGS} WHERE b.student_id = ? {NEWEST_FIRST}");
        self.fetch_all(&sql, student_id.get()).await
    }

    async fn list_by_tutor(&self, tutor_id: TutorId) -> Result<Vec<Booking>, RepositoryError> {
        let sql = format!(
            "{SELECT_BOOKINGS} JOIN tutor_subjects ts ON ts.id = b.tutor_subject_id
             WHERE ts.tutor_id = ? {NEWEST_FIRST}"
        );
        self.fetch_all(&sql, tutor_id.get()).await
    }

    async fn list_by_status(&self, status: BookingStatus) -> Result<Vec<Booking>, RepositoryError> {
        let sql = format!("{SELECT_BOOKINGS} WHERE b.status = ? {NEWEST_FIRST}");
        let rows = sqlx::query(&sql)
            .bind(status.as_str())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        rows.iter().map(booking_from_row).collect()
    }

    async fn page(
        &self,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<(Vec<Booking>, i64), RepositoryError> {
        const FROM: &str = "FROM bookings b JOIN tutor_subjects ts ON ts.id = b.tutor_subject_id
             WHERE (?1 IS NULL OR b.status = ?1)
               AND (?2 IS NULL OR b.student_id = ?2)
               AND (?3 IS NULL OR ts.tutor_id = ?3)";
        let status = filter.status.map(BookingStatus::as_str);
        let student = filter.student_id.map(StudentId::get);
        let tutor = filter.tutor_id.map(TutorId::get);

        let (total,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) {FROM}"))
            .bind(status)
            .bind(student)
            .bind(tutor)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_err)?;

        let sql = format!("SELECT b.* {FROM} {NEWEST_FIRST} LIMIT ?4 OFFSET ?5");
        let rows = sqlx::query(&sql)
            .bind(status)
            .bind(student)
            .bind(tutor)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;

        let bookings = rows
            .iter()
            .map(booking_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((bookings, total))
    }

    async fn live_for_schedule(
        &self,
        schedule_id: ScheduleId,
    ) -> Result<Option<Booking>, RepositoryError> {
        let row = sqlx::query(
            "SELECT b.* FROM bookings b WHERE b.schedule_id = ? AND b.status <> 'cancelled'",
        )
        .bind(schedule_id.get())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_err)?;
        row.as_ref().map(booking_from_row).transpose()
    }

    async fn student_has_overlap(
        &self,
        student_id: StudentId,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<bool, RepositoryError> {
        let (busy,): (bool,) = sqlx::query_as(STUDENT_OVERLAP)
            .bind(student_id.get())
            .bind(format_date(date))
            .bind(format_time(start))
            .bind(format_time(end))
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_err)?;
        Ok(busy)
    }

    async fn transition(
        &self,
        id: BookingId,
        from: BookingStatus,
        to: BookingStatus,
        release_slot: bool,
    ) -> Result<Option<Booking>, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        let done = sqlx::query("UPDATE bookings SET status = ? WHERE id = ? AND status = ?")
            .bind(to.as_str())
            .bind(id.get())
            .bind(from.as_str())
            .execute(&mut *tx)
            .await
            .map_err(query_err)?;
        if done.rows_affected() == 0 {
            return Ok(None);
        }

        if release_slot {
            sqlx::query(
                "UPDATE schedules SET is_available = 1
                 WHERE id = (SELECT schedule_id FROM bookings WHERE id = ?)",
            )
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(query_err)?;
        }

        let row = sqlx::query("SELECT b.* FROM bookings b WHERE b.id = ?")
            .bind(id.get())
            .fetch_one(&mut *tx)
            .await
            .map_err(query_err)?;
        let booking = booking_from_row(&row)?;

        tx.commit().await.map_err(query_err)?;
        Ok(Some(booking))
    }

    async fn delete_releasing_slot(&self, id: BookingId) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        let existing: Option<(i64, String)> =
            sqlx::query_as("SELECT schedule_id, status FROM bookings WHERE id = ?")
                .bind(id.get())
                .fetch_optional(&mut *tx)
                .await
                .map_err(query_err)?;
        let Some((schedule_id, status)) = existing else {
            return Ok(false);
        };

        sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(query_err)?;

        // Cancellation already released the slot; whatever happened to it
        // since belongs to the schedule owner or a newer booking.
        if status != BookingStatus::Cancelled.as_str() {
            sqlx::query(
                "UPDATE schedules SET is_available = 1
                 WHERE id = ?1 AND NOT EXISTS (
                    SELECT 1 FROM bookings WHERE schedule_id = ?1 AND status <> 'cancelled'
                 )",
            )
            .bind(schedule_id)
            .execute(&mut *tx)
            .await
            .map_err(query_err)?;
        }

        tx.commit().await.map_err(query_err)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::schedule::SqliteScheduleRepository;
    use crate::sqlite::testing::{Fixture, day, seed_slot, seed_student, test_pool};
    use chrono::Utc;
    use tutorhub_core::repository::schedule::ScheduleRepository;

    fn new_booking(fx: &Fixture, student: StudentId, slot: ScheduleId) -> NewBooking {
        NewBooking {
            student_id: student,
            tutor_subject_id: fx.offer,
            schedule_id: slot,
            format: BookingFormat::Online,
            created_at: Utc::now(),
        }
    }

    async fn claim(repo: &SqliteBookingRepository, booking: &NewBooking) -> Booking {
        match repo.claim_slot(booking).await.unwrap() {
            ClaimOutcome::Claimed(b) => b,
            other => panic!("expected claim, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_claim_marks_slot_unavailable() {
        let pool = test_pool().await;
        let fx = Fixture::new(&pool).await;
        let repo = SqliteBookingRepository::new(pool.clone());
        let slots = SqliteScheduleRepository::new(pool);

        let booking = claim(&repo, &new_booking(&fx, fx.student, fx.slot)).await;
        assert_eq!(booking.status, BookingStatus::Pending);

        let slot = slots.get_by_id(fx.slot).await.unwrap().unwrap();
        assert!(!slot.is_available);
        assert_eq!(
            repo.live_for_schedule(fx.slot).await.unwrap().map(|b| b.id),
            Some(booking.id)
        );
    }

    #[tokio::test]
    async fn test_second_claim_on_same_slot_is_refused() {
        let pool = test_pool().await;
        let fx = Fixture::new(&pool).await;
        let other = seed_student(&pool, "other@example.com", None).await;
        let repo = SqliteBookingRepository::new(pool);

        claim(&repo, &new_booking(&fx, fx.student, fx.slot)).await;
        let outcome = repo
            .claim_slot(&new_booking(&fx, other, fx.slot))
            .await
            .unwrap();
        assert_eq!(outcome, ClaimOutcome::SlotTaken);
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_claim_rejects_student_overlap_and_rolls_back() {
        let pool = test_pool().await;
        let fx = Fixture::new(&pool).await;
        let other_tutor =
            crate::sqlite::testing::seed_tutor(&pool, "second.tutor@example.com", true, false)
                .await;
        let same_time = seed_slot(&pool, other_tutor, day(10), 10).await;
        let repo = SqliteBookingRepository::new(pool.clone());

        claim(&repo, &new_booking(&fx, fx.student, fx.slot)).await;
        let outcome = repo
            .claim_slot(&new_booking(&fx, fx.student, same_time))
            .await
            .unwrap();
        assert_eq!(outcome, ClaimOutcome::StudentBusy);

        let slot = SqliteScheduleRepository::new(pool)
            .get_by_id(same_time)
            .await
            .unwrap()
            .unwrap();
        assert!(slot.is_available, "rolled back claim must leave the slot open");
    }

    #[tokio::test]
    async fn test_cancel_releases_slot_and_allows_rebooking() {
        let pool = test_pool().await;
        let fx = Fixture::new(&pool).await;
        let repo = SqliteBookingRepository::new(pool.clone());
        let slots = SqliteScheduleRepository::new(pool);

        let first = claim(&repo, &new_booking(&fx, fx.student, fx.slot)).await;
        let cancelled = repo
            .transition(first.id, BookingStatus::Pending, BookingStatus::Cancelled, true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert!(slots.get_by_id(fx.slot).await.unwrap().unwrap().is_available);

        let second = claim(&repo, &new_booking(&fx, fx.student, fx.slot)).await;
        assert_ne!(second.id, first.id);

        // Deleting the old cancelled booking leaves the new claim in place.
        assert!(repo.delete_releasing_slot(first.id).await.unwrap());
        assert!(!slots.get_by_id(fx.slot).await.unwrap().unwrap().is_available);
    }

    #[tokio::test]
    async fn test_transition_from_stale_status_is_none() {
        let pool = test_pool().await;
        let fx = Fixture::new(&pool).await;
        let repo = SqliteBookingRepository::new(pool);

        let booking = claim(&repo, &new_booking(&fx, fx.student, fx.slot)).await;
        let stale = repo
            .transition(booking.id, BookingStatus::Confirmed, BookingStatus::Completed, false)
            .await
            .unwrap();
        assert!(stale.is_none());
        assert_eq!(
            repo.get_by_id(booking.id).await.unwrap().unwrap().status,
            BookingStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_delete_releases_slot() {
        let pool = test_pool().await;
        let fx = Fixture::new(&pool).await;
        let repo = SqliteBookingRepository::new(pool.clone());

        let booking = claim(&repo, &new_booking(&fx, fx.student, fx.slot)).await;
        assert!(repo.delete_releasing_slot(booking.id).await.unwrap());
        assert!(!repo.delete_releasing_slot(booking.id).await.unwrap());

        let slot = SqliteScheduleRepository::new(pool)
            .get_by_id(fx.slot)
            .await
            .unwrap()
            .unwrap();
        assert!(slot.is_available);
    }

    #[tokio::test]
    async fn test_page_filters_by_tutor_and_status() {
        let pool = test_pool().await;
        let fx = Fixture::new(&pool).await;
        let late = seed_slot(&pool, fx.tutor, day(11), 10).await;
        let repo = SqliteBookingRepository::new(pool);

        let first = claim(&repo, &new_booking(&fx, fx.student, fx.slot)).await;
        claim(&repo, &new_booking(&fx, fx.student, late)).await;
        repo.transition(first.id, BookingStatus::Pending, BookingStatus::Confirmed, false)
            .await
            .unwrap();

        let page = PageRequest::new(1, 10).unwrap();
        let (all, total) = repo
            .page(
                BookingFilter {
                    tutor_id: Some(fx.tutor),
                    ..Default::default()
                },
                page,
            )
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert_eq!(all.len(), 2);

        let (confirmed, total) = repo
            .page(
                BookingFilter {
                    status: Some(BookingStatus::Confirmed),
                    ..Default::default()
                },
                page,
            )
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(confirmed[0].id, first.id);

        assert_eq!(repo.list_by_tutor(fx.tutor).await.unwrap().len(), 2);
        assert_eq!(repo.list_by_student(fx.student).await.unwrap().len(), 2);
        assert_eq!(
            repo.list_by_status(BookingStatus::Pending).await.unwrap().len(),
            1
        );
    }
}
