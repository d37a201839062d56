//! SQLite student repository implementation.
//!
//! A student is a `users` row plus a `students` row sharing its id.

use chrono::{DateTime, Utc};
use sqlx::Row;
use tutorhub_core::repository::student::{StudentFilter, StudentRepository};
use tutorhub_types::account::{CreateStudentRequest, Student, UpdateStudentRequest};
use tutorhub_types::error::RepositoryError;
use tutorhub_types::id::{CityId, StudentId, UserId};
use tutorhub_types::page::PageRequest;

use super::pool::DatabasePool;
use super::query_err;
use super::user::{USER_COLUMNS, delete_user, insert_user, update_user, user_from_row};

/// SQLite-backed implementation of `StudentRepository`.
pub struct SqliteStudentRepository {
    pool: DatabasePool,
}

impl SqliteStudentRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn select_students() -> String {
    format!(
        "SELECT s.id, s.city_id, s.school_grade, {USER_COLUMNS}
         FROM students s JOIN users u ON u.id = s.id"
    )
}

fn student_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Student, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(query_err)?;
    let city_id: Option<i64> = row.try_get("city_id").map_err(query_err)?;
    Ok(Student {
        id: StudentId(id),
        city_id: city_id.map(CityId),
        school_grade: row.try_get("school_grade").map_err(query_err)?,
        user: user_from_row(row, UserId(id))?,
    })
}

impl StudentRepository for SqliteStudentRepository {
    async fn create(
        &self,
        request: &CreateStudentRequest,
        registered_at: DateTime<Utc>,
    ) -> Result<Student, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        let user_id = insert_user(&mut *tx, &request.user, registered_at).await?;

        sqlx::query("INSERT INTO students (id, city_id, school_grade) VALUES (?, ?, ?)")
            .bind(user_id.get())
            .bind(request.details.city_id)
            .bind(request.details.school_grade)
            .execute(&mut *tx)
            .await
            .map_err(query_err)?;

        tx.commit().await.map_err(query_err)?;

        self.get_by_id(StudentId(user_id.get()))
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_by_id(&self, id: StudentId) -> Result<Option<Student>, RepositoryError> {
        let sql = format!("{} WHERE s.id = ?", select_students());
        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;
        row.as_ref().map(student_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<Student>, RepositoryError> {
        let sql = format!("{} ORDER BY s.id", select_students());
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        rows.iter().map(student_from_row).collect()
    }

    async fn list_by_city(&self, city_id: CityId) -> Result<Vec<Student>, RepositoryError> {
        let sql = format!("{} WHERE s.city_id = ? ORDER BY s.id", select_students());
        let rows = sqlx::query(&sql)
            .bind(city_id.get())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        rows.iter().map(student_from_row).collect()
    }

    async fn page(
        &self,
        filter: StudentFilter,
        page: PageRequest,
    ) -> Result<(Vec<Student>, i64), RepositoryError> {
        const WHERE: &str = "WHERE (?1 IS NULL OR s.city_id = ?1) AND (?2 IS NULL OR s.school_grade = ?2)";
        let city = filter.city_id.map(CityId::get);

        let (total,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM students s {WHERE}"))
            .bind(city)
            .bind(filter.school_grade)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_err)?;

        let sql = format!("{} {WHERE} ORDER BY s.id LIMIT ?3 OFFSET ?4", select_students());
        let rows = sqlx::query(&sql)
            .bind(city)
            .bind(filter.school_grade)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;

        let students = rows
            .iter()
            .map(student_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((students, total))
    }

    async fn update(
        &self,
        id: StudentId,
        request: &UpdateStudentRequest,
    ) -> Result<Student, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        update_user(&mut *tx, UserId::from(id), &request.user).await?;

        sqlx::query("UPDATE students SET city_id = ?, school_grade = ? WHERE id = ?")
            .bind(request.details.city_id)
            .bind(request.details.school_grade)
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(query_err)?;

        tx.commit().await.map_err(query_err)?;

        self.get_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: StudentId) -> Result<(), RepositoryError> {
        delete_user(&self.pool, UserId::from(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::testing::{city_request, student_request, test_pool};
    use crate::sqlite::city::SqliteCityRepository;
    use tutorhub_core::repository::city::CityRepository;
    use tutorhub_types::account::{StudentDetails, UpdateUserRequest};

    #[tokio::test]
    async fn test_create_writes_user_and_profile() {
        let repo = SqliteStudentRepository::new(test_pool().await);
        let created = repo
            .create(&student_request("ivan@example.com", None, Some(9)), Utc::now())
            .await
            .unwrap();

        assert_eq!(created.school_grade, Some(9));
        assert_eq!(created.user.email, "ivan@example.com");
        assert_eq!(created.user.id.get(), created.id.get());
    }

    #[tokio::test]
    async fn test_duplicate_email_rolls_back() {
        let pool = test_pool().await;
        let repo = SqliteStudentRepository::new(pool.clone());
        repo.create(&student_request("dup@example.com", None, None), Utc::now())
            .await
            .unwrap();

        let err = repo
            .create(&student_request("dup@example.com", None, None), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(ref m) if m.contains("email")));

        let (users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool.reader)
            .await
            .unwrap();
        assert_eq!(users, 1);
    }

    #[tokio::test]
    async fn test_page_filters_and_counts() {
        let pool = test_pool().await;
        let city = SqliteCityRepository::new(pool.clone())
            .create(&city_request("Луцьк", None))
            .await
            .unwrap();
        let repo = SqliteStudentRepository::new(pool);

        for i in 0..5 {
            let grade = if i % 2 == 0 { Some(10) } else { Some(5) };
            repo.create(
                &student_request(&format!("s{i}@example.com"), Some(city.id.get()), grade),
                Utc::now(),
            )
            .await
            .unwrap();
        }
        repo.create(&student_request("far@example.com", None, Some(10)), Utc::now())
            .await
            .unwrap();

        let first = PageRequest::new(1, 2).unwrap();
        let (items, total) = repo.page(StudentFilter::default(), first).await.unwrap();
        assert_eq!(total, 6);
        assert_eq!(items.len(), 2);

        let filter = StudentFilter {
            city_id: Some(city.id),
            school_grade: Some(10),
        };
        let (items, total) = repo.page(filter, first).await.unwrap();
        assert_eq!(total, 3);
        assert!(items.iter().all(|s| s.school_grade == Some(10)));

        let second = PageRequest::new(2, 2).unwrap();
        let (items, _) = repo.page(filter, second).await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = SqliteStudentRepository::new(test_pool().await);
        let created = repo
            .create(&student_request("old@example.com", None, Some(3)), Utc::now())
            .await
            .unwrap();

        let update = UpdateStudentRequest {
            user: UpdateUserRequest {
                first_name: "Марія".to_string(),
                last_name: "Шевченко".to_string(),
                email: "new@example.com".to_string(),
                phone: None,
            },
            details: StudentDetails {
                city_id: None,
                school_grade: Some(4),
            },
        };
        let updated = repo.update(created.id, &update).await.unwrap();
        assert_eq!(updated.user.email, "new@example.com");
        assert_eq!(updated.school_grade, Some(4));

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }
}
