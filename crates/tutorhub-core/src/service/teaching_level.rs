//! Teaching levels. Names and display positions are both unique.

use tutorhub_types::catalog::{TeachingLevel, TeachingLevelRequest};
use tutorhub_types::error::{CatalogError, RepositoryError};
use tutorhub_types::id::LevelId;

use crate::repository::teaching_level::TeachingLevelRepository;

fn storage(e: RepositoryError) -> CatalogError {
    CatalogError::StorageError(e.to_string())
}

pub struct TeachingLevelService<L: TeachingLevelRepository> {
    levels: L,
}

impl<L: TeachingLevelRepository> TeachingLevelService<L> {
    pub fn new(levels: L) -> Self {
        Self { levels }
    }

    async fn check_unique(
        &self,
        request: &TeachingLevelRequest,
        exclude: Option<LevelId>,
    ) -> Result<(), CatalogError> {
        let other = |level: &TeachingLevel| Some(level.id) != exclude;

        if let Some(level) = self.levels.get_by_name(&request.name).await.map_err(storage)? {
            if other(&level) {
                return Err(CatalogError::Duplicate(format!(
                    "Teaching level with name {} already exists",
                    request.name
                )));
            }
        }
        if let Some(level) = self
            .levels
            .get_by_position(request.position)
            .await
            .map_err(storage)?
        {
            if other(&level) {
                return Err(CatalogError::Duplicate(format!(
                    "Teaching level position {} is already in use",
                    request.position
                )));
            }
        }
        Ok(())
    }

    fn conflict(e: RepositoryError) -> CatalogError {
        match e {
            RepositoryError::Conflict(msg) => CatalogError::Duplicate(msg),
            other => storage(other),
        }
    }

    pub async fn create(
        &self,
        request: TeachingLevelRequest,
    ) -> Result<TeachingLevel, CatalogError> {
        self.check_unique(&request, None).await?;
        let level = self.levels.create(&request).await.map_err(Self::conflict)?;
        tracing::info!(level_id = %level.id, position = level.position, "teaching level created");
        Ok(level)
    }

    pub async fn update(
        &self,
        id: LevelId,
        request: TeachingLevelRequest,
    ) -> Result<TeachingLevel, CatalogError> {
        self.get(id).await?;
        self.check_unique(&request, Some(id)).await?;
        self.levels.update(id, &request).await.map_err(|e| match e {
            RepositoryError::NotFound => not_found(id),
            other => Self::conflict(other),
        })
    }

    pub async fn delete(&self, id: LevelId) -> Result<(), CatalogError> {
        self.get(id).await?;

        if self.levels.count_offers(id).await.map_err(storage)? > 0 {
            return Err(CatalogError::InUse(
                "Cannot delete a teaching level that is assigned to tutor subjects".to_string(),
            ));
        }

        self.levels.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => not_found(id),
            other => storage(other),
        })?;
        tracing::info!(level_id = %id, "teaching level deleted");
        Ok(())
    }

    pub async fn get(&self, id: LevelId) -> Result<TeachingLevel, CatalogError> {
        self.levels
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found(id))
    }

    pub async fn list(&self) -> Result<Vec<TeachingLevel>, CatalogError> {
        self.levels.list().await.map_err(storage)
    }

    pub async fn by_name(&self, name: &str) -> Result<TeachingLevel, CatalogError> {
        self.levels
            .get_by_name(name)
            .await
            .map_err(storage)?
            .ok_or_else(|| {
                CatalogError::NotFound(format!("Teaching level with name '{name}' not found"))
            })
    }

    pub async fn by_position(&self, position: i32) -> Result<TeachingLevel, CatalogError> {
        self.levels
            .get_by_position(position)
            .await
            .map_err(storage)?
            .ok_or_else(|| {
                CatalogError::NotFound(format!("Teaching level with position {position} not found"))
            })
    }

    pub async fn ordered_by_position(&self) -> Result<Vec<TeachingLevel>, CatalogError> {
        self.levels.list_by_position().await.map_err(storage)
    }
}

fn not_found(id: LevelId) -> CatalogError {
    CatalogError::NotFound(format!("Teaching level with id {id} not found"))
}
