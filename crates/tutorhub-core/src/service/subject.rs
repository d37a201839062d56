//! Subject catalog.

use tutorhub_types::catalog::{Subject, SubjectRequest};
use tutorhub_types::error::{CatalogError, RepositoryError};
use tutorhub_types::id::SubjectId;

use crate::repository::subject::SubjectRepository;

fn storage(e: RepositoryError) -> CatalogError {
    CatalogError::StorageError(e.to_string())
}

fn duplicate(name: &str) -> CatalogError {
    CatalogError::Duplicate(format!("Subject with name {name} already exists"))
}

pub struct SubjectService<Su: SubjectRepository> {
    subjects: Su,
}

impl<Su: SubjectRepository> SubjectService<Su> {
    pub fn new(subjects: Su) -> Self {
        Self { subjects }
    }

    async fn check_name_free(
        &self,
        name: &str,
        exclude: Option<SubjectId>,
    ) -> Result<(), CatalogError> {
        match self.subjects.get_by_name(name).await.map_err(storage)? {
            Some(existing) if Some(existing.id) != exclude => Err(duplicate(name)),
            _ => Ok(()),
        }
    }

    pub async fn create(&self, request: SubjectRequest) -> Result<Subject, CatalogError> {
        self.check_name_free(&request.name, None).await?;

        let subject = self.subjects.create(&request).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => duplicate(&request.name),
            other => storage(other),
        })?;
        tracing::info!(subject_id = %subject.id, name = %subject.name, "subject created");
        Ok(subject)
    }

    pub async fn update(
        &self,
        id: SubjectId,
        request: SubjectRequest,
    ) -> Result<Subject, CatalogError> {
        self.get(id).await?;
        self.check_name_free(&request.name, Some(id)).await?;

        self.subjects
            .update(id, &request)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => not_found(id),
                RepositoryError::Conflict(_) => duplicate(&request.name),
                other => storage(other),
            })
    }

    pub async fn delete(&self, id: SubjectId) -> Result<(), CatalogError> {
        self.get(id).await?;

        if self.subjects.count_offers(id).await.map_err(storage)? > 0 {
            return Err(CatalogError::InUse(
                "Cannot delete a subject that has tutor assignments".to_string(),
            ));
        }

        self.subjects.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => not_found(id),
            other => storage(other),
        })?;
        tracing::info!(subject_id = %id, "subject deleted");
        Ok(())
    }

    pub async fn get(&self, id: SubjectId) -> Result<Subject, CatalogError> {
        self.subjects
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found(id))
    }

    pub async fn list(&self) -> Result<Vec<Subject>, CatalogError> {
        self.subjects.list().await.map_err(storage)
    }

    pub async fn by_name(&self, name: &str) -> Result<Subject, CatalogError> {
        self.subjects
            .get_by_name(name)
            .await
            .map_err(storage)?
            .ok_or_else(|| CatalogError::NotFound(format!("Subject with name '{name}' not found")))
    }

    pub async fn by_category(&self, category: &str) -> Result<Vec<Subject>, CatalogError> {
        self.subjects
            .list_by_category(category)
            .await
            .map_err(storage)
    }
}

fn not_found(id: SubjectId) -> CatalogError {
    CatalogError::NotFound(format!("Subject with id {id} not found"))
}
