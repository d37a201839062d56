//! SQLite tutor subject (offer) repository implementation.

use sqlx::Row;
use tutorhub_core::repository::tutor_subject::TutorSubjectRepository;
use tutorhub_types::error::RepositoryError;
use tutorhub_types::id::{LevelId, SubjectId, TutorId, TutorSubjectId};
use tutorhub_types::money::HourlyRate;
use tutorhub_types::tutor_subject::{CreateTutorSubjectRequest, TutorPricing, TutorSubject};

use super::pool::DatabasePool;
use super::{is_unique_violation, query_err};

/// SQLite-backed implementation of `TutorSubjectRepository`.
pub struct SqliteTutorSubjectRepository {
    pool: DatabasePool,
}

impl SqliteTutorSubjectRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn list_where(&self, column: &str, id: i64) -> Result<Vec<TutorSubject>, RepositoryError> {
        let sql = format!("SELECT * FROM tutor_subjects WHERE {column} = ? ORDER BY id");
        let rows = sqlx::query(&sql)
            .bind(id)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        rows.iter().map(offer_from_row).collect()
    }
}

fn offer_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<TutorSubject, RepositoryError> {
    Ok(TutorSubject {
        id: TutorSubjectId(row.try_get("id").map_err(query_err)?),
        tutor_id: TutorId(row.try_get("tutor_id").map_err(query_err)?),
        subject_id: SubjectId(row.try_get("subject_id").map_err(query_err)?),
        level_id: LevelId(row.try_get("level_id").map_err(query_err)?),
        hourly_rate: HourlyRate::from_cents(row.try_get("hourly_rate").map_err(query_err)?),
    })
}

impl TutorSubjectRepository for SqliteTutorSubjectRepository {
    async fn create(
        &self,
        request: &CreateTutorSubjectRequest,
    ) -> Result<TutorSubject, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO tutor_subjects (tutor_id, subject_id, level_id, hourly_rate)
             VALUES (?, ?, ?, ?)",
        )
        .bind(request.tutor_id)
        .bind(request.subject_id)
        .bind(request.level_id)
        .bind(request.hourly_rate.cents())
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(done) => Ok(TutorSubject {
                id: TutorSubjectId(done.last_insert_rowid()),
                tutor_id: TutorId(request.tutor_id),
                subject_id: SubjectId(request.subject_id),
                level_id: LevelId(request.level_id),
                hourly_rate: request.hourly_rate,
            }),
            Err(e) if is_unique_violation(&e, None) => Err(RepositoryError::Conflict(
                "tutor already offers this subject at this level".to_string(),
            )),
            Err(e) => Err(query_err(e)),
        }
    }

    async fn get_by_id(&self, id: TutorSubjectId) -> Result<Option<TutorSubject>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM tutor_subjects WHERE id = ?")
            .bind(id.get())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;
        row.as_ref().map(offer_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<TutorSubject>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM tutor_subjects ORDER BY id")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        rows.iter().map(offer_from_row).collect()
    }

    async fn list_by_tutor(&self, tutor_id: TutorId) -> Result<Vec<TutorSubject>, RepositoryError> {
        self.list_where("tutor_id", tutor_id.get()).await
    }

    async fn list_by_subject(
        &self,
        subject_id: SubjectId,
    ) -> Result<Vec<TutorSubject>, RepositoryError> {
        self.list_where("subject_id", subject_id.get()).await
    }

    async fn list_by_level(&self, level_id: LevelId) -> Result<Vec<TutorSubject>, RepositoryError> {
        self.list_where("level_id", level_id.get()).await
    }

    async fn find(
        &self,
        tutor_id: TutorId,
        subject_id: SubjectId,
        level_id: LevelId,
    ) -> Result<Option<TutorSubject>, RepositoryError> {
        let row = sqlx::query(
            "SELECT * FROM tutor_subjects WHERE tutor_id = ? AND subject_id = ? AND level_id = ?",
        )
        .bind(tutor_id.get())
        .bind(subject_id.get())
        .bind(level_id.get())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_err)?;
        row.as_ref().map(offer_from_row).transpose()
    }

    async fn update_rate(
        &self,
        id: TutorSubjectId,
        rate: HourlyRate,
    ) -> Result<TutorSubject, RepositoryError> {
        let done = sqlx::query("UPDATE tutor_subjects SET hourly_rate = ? WHERE id = ?")
            .bind(rate.cents())
            .bind(id.get())
            .execute(&self.pool.writer)
            .await
            .map_err(query_err)?;

        if done.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        self.get_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: TutorSubjectId) -> Result<(), RepositoryError> {
        let done = sqlx::query("DELETE FROM tutor_subjects WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool.writer)
            .await
            .map_err(query_err)?;

        if done.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn count_bookings(
        &self,
        id: TutorSubjectId,
        active_only: bool,
    ) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM bookings
             WHERE tutor_subject_id = ? AND (? = 0 OR status IN ('pending', 'confirmed'))",
        )
        .bind(id.get())
        .bind(active_only)
        .fetch_one(&self.pool.reader)
        .await
        .map_err(query_err)?;
        Ok(count)
    }

    async fn pricing_statistics(&self) -> Result<Vec<TutorPricing>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT ts.tutor_id,
                    u.first_name || ' ' || u.last_name AS tutor_name,
                    MIN(ts.hourly_rate) AS min_rate,
                    MAX(ts.hourly_rate) AS max_rate,
                    CAST(ROUND(AVG(ts.hourly_rate)) AS INTEGER) AS avg_rate
             FROM tutor_subjects ts
             JOIN users u ON u.id = ts.tutor_id
             GROUP BY ts.tutor_id
             ORDER BY ts.tutor_id",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        rows.iter()
            .map(|row| {
                Ok(TutorPricing {
                    tutor_id: TutorId(row.try_get("tutor_id").map_err(query_err)?),
                    tutor_name: row.try_get("tutor_name").map_err(query_err)?,
                    min_rate: HourlyRate::from_cents(row.try_get("min_rate").map_err(query_err)?),
                    max_rate: HourlyRate::from_cents(row.try_get("max_rate").map_err(query_err)?),
                    avg_rate: HourlyRate::from_cents(row.try_get("avg_rate").map_err(query_err)?),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::testing::{Fixture, seed_offer, test_pool};
    use tutorhub_core::repository::teaching_level::TeachingLevelRepository;
    use tutorhub_types::catalog::TeachingLevelRequest;

    use crate::sqlite::teaching_level::SqliteTeachingLevelRepository;

    #[tokio::test]
    async fn test_duplicate_triple_conflicts() {
        let pool = test_pool().await;
        let fx = Fixture::new(&pool).await;
        let repo = SqliteTutorSubjectRepository::new(pool);

        let err = repo
            .create(&CreateTutorSubjectRequest {
                tutor_id: fx.tutor.get(),
                subject_id: fx.subject.get(),
                level_id: fx.level.get(),
                hourly_rate: HourlyRate::from_cents(10_000),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let found = repo.find(fx.tutor, fx.subject, fx.level).await.unwrap();
        assert_eq!(found.map(|o| o.id), Some(fx.offer));
    }

    #[tokio::test]
    async fn test_pricing_statistics_per_tutor() {
        let pool = test_pool().await;
        let fx = Fixture::new(&pool).await;
        let second_level = SqliteTeachingLevelRepository::new(pool.clone())
            .create(&TeachingLevelRequest {
                name: "Університет".to_string(),
                position: 2,
                description: None,
            })
            .await
            .unwrap();
        seed_offer(&pool, fx.tutor, fx.subject, second_level.id, 30_001).await;

        let repo = SqliteTutorSubjectRepository::new(pool);
        let stats = repo.pricing_statistics().await.unwrap();
        assert_eq!(stats.len(), 1);
        let s = &stats[0];
        assert_eq!(s.tutor_id, fx.tutor);
        assert_eq!(s.tutor_name, "Тарас Бондар");
        assert_eq!(s.min_rate.cents(), 30_001);
        assert_eq!(s.max_rate.cents(), 60_000);
        assert_eq!(s.avg_rate.cents(), 45_001);
    }

    #[tokio::test]
    async fn test_update_rate() {
        let pool = test_pool().await;
        let fx = Fixture::new(&pool).await;
        let repo = SqliteTutorSubjectRepository::new(pool);

        let updated = repo
            .update_rate(fx.offer, HourlyRate::from_cents(55_050))
            .await
            .unwrap();
        assert_eq!(updated.hourly_rate.to_string(), "550.50");
        assert_eq!(repo.count_bookings(fx.offer, false).await.unwrap(), 0);
    }
}
