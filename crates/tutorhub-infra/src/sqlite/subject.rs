//! SQLite subject repository implementation.

use sqlx::Row;
use tutorhub_core::repository::subject::SubjectRepository;
use tutorhub_types::catalog::{Subject, SubjectRequest};
use tutorhub_types::error::RepositoryError;
use tutorhub_types::id::SubjectId;

use super::pool::DatabasePool;
use super::{is_unique_violation, query_err};

/// SQLite-backed implementation of `SubjectRepository`.
pub struct SqliteSubjectRepository {
    pool: DatabasePool,
}

impl SqliteSubjectRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn subject_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Subject, RepositoryError> {
    Ok(Subject {
        id: SubjectId(row.try_get("id").map_err(query_err)?),
        name: row.try_get("name").map_err(query_err)?,
        category: row.try_get("category").map_err(query_err)?,
        description: row.try_get("description").map_err(query_err)?,
    })
}

fn write_err(e: sqlx::Error, name: &str) -> RepositoryError {
    if is_unique_violation(&e, Some("subjects.name")) {
        RepositoryError::Conflict(format!("Subject with name {name} already exists"))
    } else {
        query_err(e)
    }
}

impl SubjectRepository for SqliteSubjectRepository {
    async fn create(&self, subject: &SubjectRequest) -> Result<Subject, RepositoryError> {
        let done = sqlx::query("INSERT INTO subjects (name, category, description) VALUES (?, ?, ?)")
            .bind(&subject.name)
            .bind(&subject.category)
            .bind(&subject.description)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| write_err(e, &subject.name))?;

        Ok(Subject {
            id: SubjectId(done.last_insert_rowid()),
            name: subject.name.clone(),
            category: subject.category.clone(),
            description: subject.description.clone(),
        })
    }

    async fn get_by_id(&self, id: SubjectId) -> Result<Option<Subject>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM subjects WHERE id = ?")
            .bind(id.get())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;
        row.as_ref().map(subject_from_row).transpose()
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Subject>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM subjects WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;
        row.as_ref().map(subject_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<Subject>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM subjects ORDER BY id")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        rows.iter().map(subject_from_row).collect()
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Subject>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM subjects WHERE category = ? ORDER BY name")
            .bind(category)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        rows.iter().map(subject_from_row).collect()
    }

    async fn update(
        &self,
        id: SubjectId,
        subject: &SubjectRequest,
    ) -> Result<Subject, RepositoryError> {
        let done =
            sqlx::query("UPDATE subjects SET name = ?, category = ?, description = ? WHERE id = ?")
                .bind(&subject.name)
                .bind(&subject.category)
                .bind(&subject.description)
                .bind(id.get())
                .execute(&self.pool.writer)
                .await
                .map_err(|e| write_err(e, &subject.name))?;

        if done.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(Subject {
            id,
            name: subject.name.clone(),
            category: subject.category.clone(),
            description: subject.description.clone(),
        })
    }

    async fn delete(&self, id: SubjectId) -> Result<(), RepositoryError> {
        let done = sqlx::query("DELETE FROM subjects WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool.writer)
            .await
            .map_err(query_err)?;

        if done.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn count_offers(&self, id: SubjectId) -> Result<i64, RepositoryError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tutor_subjects WHERE subject_id = ?")
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
    use crate::sqlite::testing::{Fixture, test_pool};

    fn request(name: &str, category: &str) -> SubjectRequest {
        SubjectRequest {
            name: name.to_string(),
            category: category.to_string(),
            description: Some("Core curriculum".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_get_and_duplicate_name() {
        let repo = SqliteSubjectRepository::new(test_pool().await);
        let created = repo.create(&request("Фізика", "STEM")).await.unwrap();
        let found = repo.get_by_name("Фізика").await.unwrap().unwrap();
        assert_eq!(found, created);

        let err = repo.create(&request("Фізика", "Other")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_by_category_sorted_by_name() {
        let repo = SqliteSubjectRepository::new(test_pool().await);
        repo.create(&request("Хімія", "STEM")).await.unwrap();
        repo.create(&request("Біологія", "STEM")).await.unwrap();
        repo.create(&request("Англійська", "Languages")).await.unwrap();

        let stem = repo.list_by_category("STEM").await.unwrap();
        let names: Vec<_> = stem.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Біологія", "Хімія"]);
    }

    #[tokio::test]
    async fn test_count_offers() {
        let pool = test_pool().await;
        let fx = Fixture::new(&pool).await;
        let repo = SqliteSubjectRepository::new(pool);
        assert_eq!(repo.count_offers(fx.subject).await.unwrap(), 1);
    }
}
