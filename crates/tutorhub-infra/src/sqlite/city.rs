//! SQLite city repository implementation.

use sqlx::Row;
use tutorhub_core::repository::city::CityRepository;
use tutorhub_types::city::{City, CityRequest};
use tutorhub_types::error::RepositoryError;
use tutorhub_types::id::CityId;

use super::pool::DatabasePool;
use super::{is_unique_violation, query_err};

const DUPLICATE: &str = "city with the same name, region and country already exists";

/// SQLite-backed implementation of `CityRepository`.
pub struct SqliteCityRepository {
    pool: DatabasePool,
}

impl SqliteCityRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn fetch_all(&self, sql: &str, arg: Option<&str>) -> Result<Vec<City>, RepositoryError> {
        let mut query = sqlx::query(sql);
        if let Some(arg) = arg {
            query = query.bind(arg);
        }
        let rows = query.fetch_all(&self.pool.reader).await.map_err(query_err)?;
        rows.iter().map(city_from_row).collect()
    }
}

fn city_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<City, RepositoryError> {
    Ok(City {
        id: CityId(row.try_get("id").map_err(query_err)?),
        name: row.try_get("name").map_err(query_err)?,
        region: row.try_get("region").map_err(query_err)?,
        country: row.try_get("country").map_err(query_err)?,
    })
}

impl CityRepository for SqliteCityRepository {
    async fn create(&self, city: &CityRequest) -> Result<City, RepositoryError> {
        let result = sqlx::query("INSERT INTO cities (name, region, country) VALUES (?, ?, ?)")
            .bind(&city.name)
            .bind(&city.region)
            .bind(&city.country)
            .execute(&self.pool.writer)
            .await;

        match result {
            Ok(done) => Ok(City {
                id: CityId(done.last_insert_rowid()),
                name: city.name.clone(),
                region: city.region.clone(),
                country: city.country.clone(),
            }),
            Err(e) if is_unique_violation(&e, None) => {
                Err(RepositoryError::Conflict(DUPLICATE.to_string()))
            }
            Err(e) => Err(query_err(e)),
        }
    }

    async fn get_by_id(&self, id: CityId) -> Result<Option<City>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM cities WHERE id = ?")
            .bind(id.get())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;
        row.as_ref().map(city_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<City>, RepositoryError> {
        self.fetch_all("SELECT * FROM cities ORDER BY name, id", None)
            .await
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<City>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM cities WHERE name = ? ORDER BY id LIMIT 1")
            .bind(name)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;
        row.as_ref().map(city_from_row).transpose()
    }

    async fn list_by_country(&self, country: &str) -> Result<Vec<City>, RepositoryError> {
        self.fetch_all(
            "SELECT * FROM cities WHERE country = ? ORDER BY name, id",
            Some(country),
        )
        .await
    }

    async fn find_duplicate(
        &self,
        city: &CityRequest,
        exclude: Option<CityId>,
    ) -> Result<Option<City>, RepositoryError> {
        let row = sqlx::query(
            "SELECT * FROM cities
             WHERE name = ? AND COALESCE(region, '') = COALESCE(?, '') AND country = ?
               AND (? IS NULL OR id <> ?)
             LIMIT 1",
        )
        .bind(&city.name)
        .bind(&city.region)
        .bind(&city.country)
        .bind(exclude.map(CityId::get))
        .bind(exclude.map(CityId::get))
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_err)?;
        row.as_ref().map(city_from_row).transpose()
    }

    async fn update(&self, id: CityId, city: &CityRequest) -> Result<City, RepositoryError> {
        let result = sqlx::query("UPDATE cities SET name = ?, region = ?, country = ? WHERE id = ?")
            .bind(&city.name)
            .bind(&city.region)
            .bind(&city.country)
            .bind(id.get())
            .execute(&self.pool.writer)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(RepositoryError::NotFound),
            Ok(_) => Ok(City {
                id,
                name: city.name.clone(),
                region: city.region.clone(),
                country: city.country.clone(),
            }),
            Err(e) if is_unique_violation(&e, None) => {
                Err(RepositoryError::Conflict(DUPLICATE.to_string()))
            }
            Err(e) => Err(query_err(e)),
        }
    }

    async fn delete(&self, id: CityId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cities WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool.writer)
            .await
            .map_err(query_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn count_residents(&self, id: CityId) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT (SELECT COUNT(*) FROM students WHERE city_id = ?1)
                  + (SELECT COUNT(*) FROM tutors WHERE city_id = ?1)",
        )
        .bind(id.get())
        .fetch_one(&self.pool.reader)
        .await
        .map_err(query_err)?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::testing::{city_request, seed_student, test_pool};

    #[tokio::test]
    async fn test_create_and_get_by_id() {
        let repo = SqliteCityRepository::new(test_pool().await);
        let created = repo.create(&city_request("Львів", Some("Львівська"))).await.unwrap();

        let found = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Львів");
        assert_eq!(found.region.as_deref(), Some("Львівська"));
        assert_eq!(found.country, "Україна");
    }

    #[tokio::test]
    async fn test_duplicate_identity_conflicts_even_without_region() {
        let repo = SqliteCityRepository::new(test_pool().await);
        repo.create(&city_request("Київ", None)).await.unwrap();

        let err = repo.create(&city_request("Київ", None)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        // Same name in another region is a different city.
        repo.create(&city_request("Київ", Some("Інша"))).await.unwrap();
    }

    #[tokio::test]
    async fn test_find_duplicate_excludes_self() {
        let repo = SqliteCityRepository::new(test_pool().await);
        let city = repo.create(&city_request("Одеса", None)).await.unwrap();

        let req = city_request("Одеса", None);
        assert!(repo.find_duplicate(&req, None).await.unwrap().is_some());
        assert!(repo.find_duplicate(&req, Some(city.id)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lookups() {
        let repo = SqliteCityRepository::new(test_pool().await);
        repo.create(&city_request("Харків", None)).await.unwrap();
        let mut other = city_request("Warsaw", None);
        other.country = "Poland".to_string();
        repo.create(&other).await.unwrap();

        assert_eq!(repo.list().await.unwrap().len(), 2);
        assert_eq!(repo.list_by_country("Poland").await.unwrap().len(), 1);
        assert!(repo.get_by_name("Харків").await.unwrap().is_some());
        assert!(repo.get_by_name("Дніпро").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_count_residents() {
        let pool = test_pool().await;
        let repo = SqliteCityRepository::new(pool.clone());
        let city = repo.create(&city_request("Полтава", None)).await.unwrap();
        assert_eq!(repo.count_residents(city.id).await.unwrap(), 0);

        seed_student(&pool, "res@example.com", Some(city.id)).await;
        assert_eq!(repo.count_residents(city.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let repo = SqliteCityRepository::new(test_pool().await);
        let err = repo.update(CityId(99), &city_request("Суми", None)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
        assert!(matches!(repo.delete(CityId(99)).await, Err(RepositoryError::NotFound)));
    }
}
