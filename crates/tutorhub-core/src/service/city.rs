//! City directory.

use tutorhub_types::city::{City, CityRequest};
use tutorhub_types::error::{CatalogError, RepositoryError};
use tutorhub_types::id::CityId;

use crate::repository::city::CityRepository;

const DUPLICATE_CITY: &str = "City with the same name, region and country already exists";

fn storage(e: RepositoryError) -> CatalogError {
    CatalogError::StorageError(e.to_string())
}

pub struct CityService<Ci: CityRepository> {
    cities: Ci,
}

impl<Ci: CityRepository> CityService<Ci> {
    pub fn new(cities: Ci) -> Self {
        Self { cities }
    }

    pub async fn create(&self, request: CityRequest) -> Result<City, CatalogError> {
        if self
            .cities
            .find_duplicate(&request, None)
            .await
            .map_err(storage)?
            .is_some()
        {
            return Err(CatalogError::Duplicate(DUPLICATE_CITY.to_string()));
        }

        let city = self.cities.create(&request).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => CatalogError::Duplicate(DUPLICATE_CITY.to_string()),
            other => storage(other),
        })?;
        tracing::info!(city_id = %city.id, name = %city.name, "city created");
        Ok(city)
    }

    pub async fn update(&self, id: CityId, request: CityRequest) -> Result<City, CatalogError> {
        self.get(id).await?;

        if self
            .cities
            .find_duplicate(&request, Some(id))
            .await
            .map_err(storage)?
            .is_some()
        {
            return Err(CatalogError::Duplicate(DUPLICATE_CITY.to_string()));
        }

        self.cities.update(id, &request).await.map_err(|e| match e {
            RepositoryError::NotFound => not_found(id),
            RepositoryError::Conflict(_) => CatalogError::Duplicate(DUPLICATE_CITY.to_string()),
            other => storage(other),
        })
    }

    /// Delete a city nobody lives in.
    pub async fn delete(&self, id: CityId) -> Result<(), CatalogError> {
        self.get(id).await?;

        if self.cities.count_residents(id).await.map_err(storage)? > 0 {
            tracing::debug!(city_id = %id, "city delete refused: still referenced");
            return Err(CatalogError::InUse(
                "Cannot delete a city that has associated students or tutors".to_string(),
            ));
        }

        self.cities.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => not_found(id),
            other => storage(other),
        })?;
        tracing::info!(city_id = %id, "city deleted");
        Ok(())
    }

    pub async fn get(&self, id: CityId) -> Result<City, CatalogError> {
        self.cities
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found(id))
    }

    pub async fn list(&self) -> Result<Vec<City>, CatalogError> {
        self.cities.list().await.map_err(storage)
    }

    pub async fn by_name(&self, name: &str) -> Result<City, CatalogError> {
        self.cities
            .get_by_name(name)
            .await
            .map_err(storage)?
            .ok_or_else(|| CatalogError::NotFound(format!("City with name '{name}' not found")))
    }

    pub async fn by_country(&self, country: &str) -> Result<Vec<City>, CatalogError> {
        self.cities.list_by_country(country).await.map_err(storage)
    }
}

fn not_found(id: CityId) -> CatalogError {
    CatalogError::NotFound(format!("City with id {id} not found"))
}
