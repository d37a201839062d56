//! SQLite tutor repository implementation.
//!
//! A tutor is a `users` row plus a `tutors` row sharing its id. Search and
//! rankings join through `tutor_subjects`, `bookings` and `reviews`.

use chrono::{DateTime, Utc};
use sqlx::Row;
use tutorhub_core::repository::SortOrder;
use tutorhub_core::repository::tutor::{TutorFootprint, TutorRepository, TutorSort};
use tutorhub_types::account::{
    CreateTutorRequest, Tutor, TutorDetails, TutorRating, TutorSearchCriteria, UpdateTutorRequest,
};
use tutorhub_types::error::RepositoryError;
use tutorhub_types::id::{CityId, TutorId, UserId};
use tutorhub_types::page::PageRequest;

use super::pool::DatabasePool;
use super::query_err;
use super::user::{USER_COLUMNS, delete_user, insert_user, update_user, user_from_row};

const TUTOR_COLUMNS: &str = "t.id, t.city_id, t.years_experience, t.education, t.about_me, \
     t.online_available, t.offline_available, t.address";

/// SQLite-backed implementation of `TutorRepository`.
pub struct SqliteTutorRepository {
    pool: DatabasePool,
}

impl SqliteTutorRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn fetch_tutors(
        &self,
        filter_and_order: &str,
        id: Option<i64>,
    ) -> Result<Vec<Tutor>, RepositoryError> {
        let sql = format!("{} {filter_and_order}", select_tutors());
        let mut query = sqlx::query(&sql);
        if let Some(id) = id {
            query = query.bind(id);
        }
        let rows = query.fetch_all(&self.pool.reader).await.map_err(query_err)?;
        rows.iter().map(tutor_from_row).collect()
    }
}

fn select_tutors() -> String {
    format!("SELECT {TUTOR_COLUMNS}, {USER_COLUMNS} FROM tutors t JOIN users u ON u.id = t.id")
}

fn tutor_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Tutor, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(query_err)?;
    let city_id: Option<i64> = row.try_get("city_id").map_err(query_err)?;
    Ok(Tutor {
        id: TutorId(id),
        city_id: city_id.map(CityId),
        years_experience: row.try_get("years_experience").map_err(query_err)?,
        education: row.try_get("education").map_err(query_err)?,
        about_me: row.try_get("about_me").map_err(query_err)?,
        online_available: row.try_get("online_available").map_err(query_err)?,
        offline_available: row.try_get("offline_available").map_err(query_err)?,
        address: row.try_get("address").map_err(query_err)?,
        user: user_from_row(row, UserId(id))?,
    })
}

fn order_clause(sort: TutorSort, order: SortOrder) -> String {
    let dir = order.as_sql();
    match sort {
        TutorSort::Experience => format!("ORDER BY t.years_experience {dir}, t.id"),
        TutorSort::Name => format!("ORDER BY u.last_name {dir}, u.first_name {dir}, t.id"),
        TutorSort::Id => format!("ORDER BY t.id {dir}"),
    }
}

async fn write_details(
    conn: &mut sqlx::SqliteConnection,
    id: i64,
    details: &TutorDetails,
    insert: bool,
) -> Result<(), RepositoryError> {
    let sql = if insert {
        "INSERT INTO tutors (city_id, years_experience, education, about_me, online_available, offline_available, address, id)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
    } else {
        "UPDATE tutors SET city_id = ?, years_experience = ?, education = ?, about_me = ?,
             online_available = ?, offline_available = ?, address = ?
         WHERE id = ?"
    };
    sqlx::query(sql)
        .bind(details.city_id)
        .bind(details.years_experience)
        .bind(&details.education)
        .bind(&details.about_me)
        .bind(details.online_available)
        .bind(details.offline_available)
        .bind(&details.address)
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(query_err)?;
    Ok(())
}

impl TutorRepository for SqliteTutorRepository {
    async fn create(
        &self,
        request: &CreateTutorRequest,
        registered_at: DateTime<Utc>,
    ) -> Result<Tutor, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        let user_id = insert_user(&mut *tx, &request.user, registered_at).await?;
        write_details(&mut *tx, user_id.get(), &request.details, true).await?;

        tx.commit().await.map_err(query_err)?;

        self.get_by_id(TutorId(user_id.get()))
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_by_id(&self, id: TutorId) -> Result<Option<Tutor>, RepositoryError> {
        let sql = format!("{} WHERE t.id = ?", select_tutors());
        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;
        row.as_ref().map(tutor_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<Tutor>, RepositoryError> {
        self.fetch_tutors("ORDER BY t.id", None).await
    }

    async fn list_by_city(&self, city_id: CityId) -> Result<Vec<Tutor>, RepositoryError> {
        self.fetch_tutors("WHERE t.city_id = ? ORDER BY t.id", Some(city_id.get()))
            .await
    }

    async fn page(
        &self,
        sort: TutorSort,
        order: SortOrder,
        page: PageRequest,
    ) -> Result<(Vec<Tutor>, i64), RepositoryError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tutors")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_err)?;

        let sql = format!(
            "{} {} LIMIT ? OFFSET ?",
            select_tutors(),
            order_clause(sort, order)
        );
        let rows = sqlx::query(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;

        let tutors = rows
            .iter()
            .map(tutor_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((tutors, total))
    }

    async fn search(&self, criteria: &TutorSearchCriteria) -> Result<Vec<Tutor>, RepositoryError> {
        // Offer-level criteria must all hold for one and the same offer.
        let sql = format!(
            "{} WHERE (?1 IS NULL OR t.city_id = ?1)
               AND (?6 = 0 OR t.online_available = 1)
               AND (?7 = 0 OR t.offline_available = 1)
               AND ((?2 IS NULL AND ?3 IS NULL AND ?4 IS NULL AND ?5 IS NULL)
                    OR EXISTS (
                        SELECT 1 FROM tutor_subjects ts
                        WHERE ts.tutor_id = t.id
                          AND (?2 IS NULL OR ts.subject_id = ?2)
                          AND (?3 IS NULL OR ts.level_id = ?3)
                          AND (?4 IS NULL OR ts.hourly_rate >= ?4)
                          AND (?5 IS NULL OR ts.hourly_rate <= ?5)))
             ORDER BY t.id",
            select_tutors()
        );
        let rows = sqlx::query(&sql)
            .bind(criteria.city_id)
            .bind(criteria.subject_id)
            .bind(criteria.level_id)
            .bind(criteria.min_price.map(|p| p.cents()))
            .bind(criteria.max_price.map(|p| p.cents()))
            .bind(criteria.online_only)
            .bind(criteria.offline_only)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        rows.iter().map(tutor_from_row).collect()
    }

    async fn top_rated(&self, limit: i64) -> Result<Vec<TutorRating>, RepositoryError> {
        let sql = format!(
            "SELECT {TUTOR_COLUMNS}, {USER_COLUMNS},
                    AVG(r.rating) AS average_rating, COUNT(r.id) AS review_count
             FROM tutors t
             JOIN users u ON u.id = t.id
             JOIN tutor_subjects ts ON ts.tutor_id = t.id
             JOIN bookings b ON b.tutor_subject_id = ts.id
             JOIN reviews r ON r.booking_id = b.id
             GROUP BY t.id
             ORDER BY average_rating DESC, review_count DESC, t.id
             LIMIT ?"
        );
        let rows = sqlx::query(&sql)
            .bind(limit)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;

        rows.iter()
            .map(|row| {
                Ok(TutorRating {
                    tutor: tutor_from_row(row)?,
                    average_rating: row.try_get("average_rating").map_err(query_err)?,
                    review_count: row.try_get("review_count").map_err(query_err)?,
                })
            })
            .collect()
    }

    async fn update(
        &self,
        id: TutorId,
        request: &UpdateTutorRequest,
    ) -> Result<Tutor, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        update_user(&mut *tx, UserId::from(id), &request.user).await?;
        write_details(&mut *tx, id.get(), &request.details, false).await?;

        tx.commit().await.map_err(query_err)?;

        self.get_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: TutorId) -> Result<(), RepositoryError> {
        delete_user(&self.pool, UserId::from(id)).await
    }

    async fn footprint(&self, id: TutorId) -> Result<TutorFootprint, RepositoryError> {
        let row = sqlx::query(
            "SELECT
                (SELECT COUNT(*) FROM schedules WHERE tutor_id = ?1) AS schedules,
                (SELECT COUNT(*) FROM tutor_subjects WHERE tutor_id = ?1) AS offers,
                (SELECT COUNT(*) FROM bookings b
                   JOIN tutor_subjects ts ON ts.id = b.tutor_subject_id
                  WHERE ts.tutor_id = ?1) AS bookings",
        )
        .bind(id.get())
        .fetch_one(&self.pool.reader)
        .await
        .map_err(query_err)?;

        Ok(TutorFootprint {
            schedules: row.try_get("schedules").map_err(query_err)?,
            offers: row.try_get("offers").map_err(query_err)?,
            bookings: row.try_get("bookings").map_err(query_err)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::testing::{Fixture, seed_offer, seed_tutor, test_pool, tutor_request};
    use tutorhub_types::money::HourlyRate;

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = SqliteTutorRepository::new(test_pool().await);
        let tutor = repo
            .create(&tutor_request("t@example.com", true, false), Utc::now())
            .await
            .unwrap();

        let found = repo.get_by_id(tutor.id).await.unwrap().unwrap();
        assert!(found.online_available);
        assert!(!found.offline_available);
        assert_eq!(found.user.email, "t@example.com");
    }

    #[tokio::test]
    async fn test_page_sorted_by_experience() {
        let pool = test_pool().await;
        let repo = SqliteTutorRepository::new(pool.clone());
        for (i, years) in [3, 10, 1].into_iter().enumerate() {
            let mut req = tutor_request(&format!("x{i}@example.com"), true, false);
            req.details.years_experience = years;
            repo.create(&req, Utc::now()).await.unwrap();
        }

        let page = PageRequest::new(1, 2).unwrap();
        let (items, total) = repo
            .page(TutorSort::Experience, SortOrder::Desc, page)
            .await
            .unwrap();
        assert_eq!(total, 3);
        assert_eq!(
            items.iter().map(|t| t.years_experience).collect::<Vec<_>>(),
            vec![10, 3]
        );
    }

    #[tokio::test]
    async fn test_search_by_offer_and_price() {
        let pool = test_pool().await;
        let fx = Fixture::new(&pool).await;
        let cheap = seed_tutor(&pool, "cheap@example.com", true, false).await;
        let pricey = seed_tutor(&pool, "pricey@example.com", true, false).await;
        seed_offer(&pool, cheap, fx.subject, fx.level, 20_000).await;
        seed_offer(&pool, pricey, fx.subject, fx.level, 90_000).await;

        let repo = SqliteTutorRepository::new(pool);
        let criteria = TutorSearchCriteria {
            subject_id: Some(fx.subject.get()),
            max_price: Some(HourlyRate::from_cents(50_000)),
            ..Default::default()
        };
        let found = repo.search(&criteria).await.unwrap();
        assert_eq!(found.iter().map(|t| t.id).collect::<Vec<_>>(), vec![cheap]);

        let all = repo.search(&TutorSearchCriteria::default()).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_search_format_flags() {
        let pool = test_pool().await;
        let online = seed_tutor(&pool, "on@example.com", true, false).await;
        let both = seed_tutor(&pool, "both@example.com", true, true).await;
        let repo = SqliteTutorRepository::new(pool);

        let offline_only = TutorSearchCriteria {
            offline_only: true,
            ..Default::default()
        };
        let found = repo.search(&offline_only).await.unwrap();
        assert_eq!(found.iter().map(|t| t.id).collect::<Vec<_>>(), vec![both]);

        let online_only = TutorSearchCriteria {
            online_only: true,
            ..Default::default()
        };
        let found = repo.search(&online_only).await.unwrap();
        assert_eq!(
            found.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![online, both]
        );
    }

    #[tokio::test]
    async fn test_top_rated_skips_unreviewed() {
        let pool = test_pool().await;
        let fx = Fixture::new(&pool).await;
        let repo = SqliteTutorRepository::new(pool);
        assert!(repo.top_rated(10).await.unwrap().is_empty());
        assert!(repo.get_by_id(fx.tutor).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let pool = test_pool().await;
        let fx = Fixture::new(&pool).await;
        let repo = SqliteTutorRepository::new(pool.clone());

        let footprint = repo.footprint(fx.tutor).await.unwrap();
        assert_eq!(footprint.offers, 1);
        assert_eq!(footprint.schedules, 1);

        repo.delete(fx.tutor).await.unwrap();
        let (offers,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tutor_subjects")
            .fetch_one(&pool.reader)
            .await
            .unwrap();
        assert_eq!(offers, 0);
        assert!(matches!(repo.delete(fx.tutor).await, Err(RepositoryError::NotFound)));
    }
}
