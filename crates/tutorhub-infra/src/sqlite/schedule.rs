//! SQLite schedule slot repository implementation.
//!
//! Writes against an existing slot carry a `NOT EXISTS` guard on live
//! bookings, so the check and the write are one statement on the writer.
//! The tutor's same-day overlap rule is enforced on the writer as well.

use chrono::{NaiveDate, NaiveTime};
use sqlx::Row;
use tutorhub_core::repository::schedule::{NewSchedule, ScheduleRepository};
use tutorhub_types::error::RepositoryError;
use tutorhub_types::id::{ScheduleId, TutorId};
use tutorhub_types::schedule::{Schedule, UpdateScheduleRequest};

use super::pool::DatabasePool;
use super::{
    format_date, format_datetime, format_time, is_unique_violation, parse_date, parse_datetime,
    parse_time, query_err,
};

const UNBOOKED: &str =
    "NOT EXISTS (SELECT 1 FROM bookings b WHERE b.schedule_id = schedules.id AND b.status <> 'cancelled')";

/// SQLite-backed implementation of `ScheduleRepository`.
pub struct SqliteScheduleRepository {
    pool: DatabasePool,
}

impl SqliteScheduleRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

pub(crate) fn schedule_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Schedule, RepositoryError> {
    let date: String = row.try_get("date").map_err(query_err)?;
    let start: String = row.try_get("start_time").map_err(query_err)?;
    let end: String = row.try_get("end_time").map_err(query_err)?;
    let created: String = row.try_get("created_at").map_err(query_err)?;
    Ok(Schedule {
        id: ScheduleId(row.try_get("id").map_err(query_err)?),
        tutor_id: TutorId(row.try_get("tutor_id").map_err(query_err)?),
        date: parse_date(&date)?,
        start_time: parse_time(&start)?,
        end_time: parse_time(&end)?,
        is_available: row.try_get("is_available").map_err(query_err)?,
        created_at: parse_datetime(&created)?,
    })
}

impl ScheduleRepository for SqliteScheduleRepository {
    async fn create(&self, slot: &NewSchedule) -> Result<Schedule, RepositoryError> {
        // The overlap guard runs inside the INSERT, so two concurrent
        // requests for intersecting windows cannot both land.
        let result = sqlx::query(
            "INSERT INTO schedules (tutor_id, date, start_time, end_time, is_available, created_at)
             SELECT ?1, ?2, ?3, ?4, 1, ?5
             WHERE NOT EXISTS (
                SELECT 1 FROM schedules
                WHERE tutor_id = ?1 AND date = ?2 AND start_time < ?4 AND end_time > ?3
             )",
        )
        .bind(slot.tutor_id.get())
        .bind(format_date(slot.date))
        .bind(format_time(slot.start_time))
        .bind(format_time(slot.end_time))
        .bind(format_datetime(&slot.created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(RepositoryError::Conflict(
                "schedule slot overlaps an existing slot".to_string(),
            )),
            Ok(done) => Ok(Schedule {
                id: ScheduleId(done.last_insert_rowid()),
                tutor_id: slot.tutor_id,
                date: slot.date,
                start_time: slot.start_time,
                end_time: slot.end_time,
                is_available: true,
                created_at: slot.created_at,
            }),
            Err(e) if is_unique_violation(&e, None) => Err(RepositoryError::Conflict(
                "schedule slot already exists".to_string(),
            )),
            Err(e) => Err(query_err(e)),
        }
    }

    async fn get_by_id(&self, id: ScheduleId) -> Result<Option<Schedule>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM schedules WHERE id = ?")
            .bind(id.get())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;
        row.as_ref().map(schedule_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<Schedule>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM schedules ORDER BY date, start_time, id")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        rows.iter().map(schedule_from_row).collect()
    }

    async fn list_by_tutor(&self, tutor_id: TutorId) -> Result<Vec<Schedule>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM schedules WHERE tutor_id = ? ORDER BY date, start_time, id",
        )
        .bind(tutor_id.get())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;
        rows.iter().map(schedule_from_row).collect()
    }

    async fn list_available_by_tutor(
        &self,
        tutor_id: TutorId,
        from: NaiveDate,
    ) -> Result<Vec<Schedule>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM schedules
             WHERE tutor_id = ? AND is_available = 1 AND date >= ?
             ORDER BY date, start_time, id",
        )
        .bind(tutor_id.get())
        .bind(format_date(from))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;
        rows.iter().map(schedule_from_row).collect()
    }

    async fn list_by_tutor_and_date(
        &self,
        tutor_id: TutorId,
        date: NaiveDate,
    ) -> Result<Vec<Schedule>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM schedules WHERE tutor_id = ? AND date = ? ORDER BY start_time, id",
        )
        .bind(tutor_id.get())
        .bind(format_date(date))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;
        rows.iter().map(schedule_from_row).collect()
    }

    async fn find_overlapping(
        &self,
        tutor_id: TutorId,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        exclude: Option<ScheduleId>,
    ) -> Result<Vec<Schedule>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM schedules
             WHERE tutor_id = ?1 AND date = ?2 AND start_time < ?4 AND end_time > ?3
               AND (?5 IS NULL OR id <> ?5)
             ORDER BY start_time, id",
        )
        .bind(tutor_id.get())
        .bind(format_date(date))
        .bind(format_time(start))
        .bind(format_time(end))
        .bind(exclude.map(ScheduleId::get))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;
        rows.iter().map(schedule_from_row).collect()
    }

    async fn has_live_booking(&self, id: ScheduleId) -> Result<bool, RepositoryError> {
        let (live,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM bookings WHERE schedule_id = ? AND status <> 'cancelled')",
        )
        .bind(id.get())
        .fetch_one(&self.pool.reader)
        .await
        .map_err(query_err)?;
        Ok(live)
    }

    async fn update_unbooked(
        &self,
        id: ScheduleId,
        request: &UpdateScheduleRequest,
    ) -> Result<Option<Schedule>, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        let tutor_id: Option<(i64,)> = sqlx::query_as("SELECT tutor_id FROM schedules WHERE id = ?")
            .bind(id.get())
            .fetch_optional(&mut *tx)
            .await
            .map_err(query_err)?;
        let Some((tutor_id,)) = tutor_id else {
            return Err(RepositoryError::NotFound);
        };

        let date = format_date(request.date);
        let start = format_time(request.start_time);
        let end = format_time(request.end_time);

        let (overlaps,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM schedules
                WHERE tutor_id = ?1 AND date = ?2 AND start_time < ?4 AND end_time > ?3
                  AND id <> ?5
             )",
        )
        .bind(tutor_id)
        .bind(&date)
        .bind(&start)
        .bind(&end)
        .bind(id.get())
        .fetch_one(&mut *tx)
        .await
        .map_err(query_err)?;
        if overlaps {
            return Err(RepositoryError::Conflict(
                "schedule slot overlaps an existing slot".to_string(),
            ));
        }

        let sql = format!(
            "UPDATE schedules SET date = ?, start_time = ?, end_time = ?, is_available = ?
             WHERE id = ? AND {UNBOOKED}"
        );
        let result = sqlx::query(&sql)
            .bind(&date)
            .bind(&start)
            .bind(&end)
            .bind(request.is_available)
            .bind(id.get())
            .execute(&mut *tx)
            .await;

        let done = match result {
            Ok(done) => done,
            Err(e) if is_unique_violation(&e, None) => {
                return Err(RepositoryError::Conflict(
                    "schedule slot already exists".to_string(),
                ));
            }
            Err(e) => return Err(query_err(e)),
        };
        if done.rows_affected() == 0 {
            // The slot picked up a live booking.
            return Ok(None);
        }

        let row = sqlx::query("SELECT * FROM schedules WHERE id = ?")
            .bind(id.get())
            .fetch_one(&mut *tx)
            .await
            .map_err(query_err)?;
        let updated = schedule_from_row(&row)?;

        tx.commit().await.map_err(query_err)?;
        Ok(Some(updated))
    }

    async fn set_availability_unbooked(
        &self,
        id: ScheduleId,
        available: bool,
    ) -> Result<bool, RepositoryError> {
        let sql = format!("UPDATE schedules SET is_available = ? WHERE id = ? AND {UNBOOKED}");
        let done = sqlx::query(&sql)
            .bind(available)
            .bind(id.get())
            .execute(&self.pool.writer)
            .await
            .map_err(query_err)?;
        Ok(done.rows_affected() > 0)
    }

    async fn delete_unbooked(&self, id: ScheduleId) -> Result<bool, RepositoryError> {
        let sql = format!("DELETE FROM schedules WHERE id = ? AND {UNBOOKED}");
        let done = sqlx::query(&sql)
            .bind(id.get())
            .execute(&self.pool.writer)
            .await
            .map_err(query_err)?;
        Ok(done.rows_affected() > 0)
    }
}
