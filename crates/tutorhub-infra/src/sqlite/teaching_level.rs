//! SQLite teaching level repository implementation.

use sqlx::Row;
use tutorhub_core::repository::teaching_level::TeachingLevelRepository;
use tutorhub_types::catalog::{TeachingLevel, TeachingLevelRequest};
use tutorhub_types::error::RepositoryError;
use tutorhub_types::id::LevelId;

use super::pool::DatabasePool;
use super::{is_unique_violation, query_err};

/// SQLite-backed implementation of `TeachingLevelRepository`.
pub struct SqliteTeachingLevelRepository {
    pool: DatabasePool,
}

impl SqliteTeachingLevelRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn fetch_one_by(
        &self,
        sql: &str,
        bind: impl Into<LevelKey<'_>>,
    ) -> Result<Option<TeachingLevel>, RepositoryError> {
        let query = sqlx::query(sql);
        let query = match bind.into() {
            LevelKey::Id(id) => query.bind(id),
            LevelKey::Name(name) => query.bind(name),
            LevelKey::Position(position) => query.bind(position),
        };
        let row = query
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;
        row.as_ref().map(level_from_row).transpose()
    }
}

/// The unique keys a level can be looked up by.
enum LevelKey<'a> {
    Id(i64),
    Name(&'a str),
    Position(i32),
}

impl From<LevelId> for LevelKey<'_> {
    fn from(id: LevelId) -> Self {
        LevelKey::Id(id.get())
    }
}

impl<'a> From<&'a str> for LevelKey<'a> {
    fn from(name: &'a str) -> Self {
        LevelKey::Name(name)
    }
}

impl From<i32> for LevelKey<'_> {
    fn from(position: i32) -> Self {
        LevelKey::Position(position)
    }
}

fn level_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<TeachingLevel, RepositoryError> {
    Ok(TeachingLevel {
        id: LevelId(row.try_get("id").map_err(query_err)?),
        name: row.try_get("name").map_err(query_err)?,
        position: row.try_get("position").map_err(query_err)?,
        description: row.try_get("description").map_err(query_err)?,
    })
}

fn write_err(e: sqlx::Error, level: &TeachingLevelRequest) -> RepositoryError {
    if is_unique_violation(&e, Some("teaching_levels.name")) {
        RepositoryError::Conflict(format!(
            "Teaching level with name {} already exists",
            level.name
        ))
    } else if is_unique_violation(&e, Some("teaching_levels.position")) {
        RepositoryError::Conflict(format!(
            "Teaching level position {} is already in use",
            level.position
        ))
    } else {
        query_err(e)
    }
}

impl TeachingLevelRepository for SqliteTeachingLevelRepository {
    async fn create(&self, level: &TeachingLevelRequest) -> Result<TeachingLevel, RepositoryError> {
        let done = sqlx::query(
            "INSERT INTO teaching_levels (name, position, description) VALUES (?, ?, ?)",
        )
        .bind(&level.name)
        .bind(level.position)
        .bind(&level.description)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| write_err(e, level))?;

        Ok(TeachingLevel {
            id: LevelId(done.last_insert_rowid()),
            name: level.name.clone(),
            position: level.position,
            description: level.description.clone(),
        })
    }

    async fn get_by_id(&self, id: LevelId) -> Result<Option<TeachingLevel>, RepositoryError> {
        self.fetch_one_by("SELECT * FROM teaching_levels WHERE id = ?", id)
            .await
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<TeachingLevel>, RepositoryError> {
        self.fetch_one_by("SELECT * FROM teaching_levels WHERE name = ?", name)
            .await
    }

    async fn get_by_position(
        &self,
        position: i32,
    ) -> Result<Option<TeachingLevel>, RepositoryError> {
        self.fetch_one_by("SELECT * FROM teaching_levels WHERE position = ?", position)
            .await
    }

    async fn list(&self) -> Result<Vec<TeachingLevel>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM teaching_levels ORDER BY id")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        rows.iter().map(level_from_row).collect()
    }

    async fn list_by_position(&self) -> Result<Vec<TeachingLevel>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM teaching_levels ORDER BY position")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        rows.iter().map(level_from_row).collect()
    }

    async fn update(
        &self,
        id: LevelId,
        level: &TeachingLevelRequest,
    ) -> Result<TeachingLevel, RepositoryError> {
        let done = sqlx::query(
            "UPDATE teaching_levels SET name = ?, position = ?, description = ? WHERE id = ?",
        )
        .bind(&level.name)
        .bind(level.position)
        .bind(&level.description)
        .bind(id.get())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| write_err(e, level))?;

        if done.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(TeachingLevel {
            id,
            name: level.name.clone(),
            position: level.position,
            description: level.description.clone(),
        })
    }

    async fn delete(&self, id: LevelId) -> Result<(), RepositoryError> {
        let done = sqlx::query("DELETE FROM teaching_levels WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool.writer)
            .await
            .map_err(query_err)?;

        if done.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn count_offers(&self, id: LevelId) -> Result<i64, RepositoryError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tutor_subjects WHERE level_id = ?")
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
    use crate::sqlite::testing::test_pool;

    fn request(name: &str, position: i32) -> TeachingLevelRequest {
        TeachingLevelRequest {
            name: name.to_string(),
            position,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_lookup_by_each_key() {
        let repo = SqliteTeachingLevelRepository::new(test_pool().await);
        let level = repo.create(&request("Початкова школа", 1)).await.unwrap();

        assert_eq!(repo.get_by_id(level.id).await.unwrap(), Some(level.clone()));
        assert_eq!(repo.get_by_name("Початкова школа").await.unwrap(), Some(level.clone()));
        assert_eq!(repo.get_by_position(1).await.unwrap(), Some(level));
        assert!(repo.get_by_position(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_position_conflict_names_the_column() {
        let repo = SqliteTeachingLevelRepository::new(test_pool().await);
        repo.create(&request("ЗНО", 3)).await.unwrap();

        let err = repo.create(&request("НМТ", 3)).await.unwrap_err();
        match err {
            RepositoryError::Conflict(msg) => assert!(msg.contains("position 3")),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ordered_by_position() {
        let repo = SqliteTeachingLevelRepository::new(test_pool().await);
        repo.create(&request("Університет", 3)).await.unwrap();
        repo.create(&request("Початкова", 1)).await.unwrap();
        repo.create(&request("Середня", 2)).await.unwrap();

        let ordered = repo.list_by_position().await.unwrap();
        let positions: Vec<_> = ordered.iter().map(|l| l.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }
}
