//! City repository trait definition.

use tutorhub_types::city::{City, CityRequest};
use tutorhub_types::error::RepositoryError;
use tutorhub_types::id::CityId;

pub trait CityRepository: Send + Sync {
    fn create(
        &self,
        city: &CityRequest,
    ) -> impl std::future::Future<Output = Result<City, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: CityId,
    ) -> impl std::future::Future<Output = Result<Option<City>, RepositoryError>> + Send;

    /// All cities, ordered by name.
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<City>, RepositoryError>> + Send;

    /// First city (lowest id) with exactly this name. Names can repeat
    /// across regions.
    fn get_by_name(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Option<City>, RepositoryError>> + Send;

    fn list_by_country(
        &self,
        country: &str,
    ) -> impl std::future::Future<Output = Result<Vec<City>, RepositoryError>> + Send;

    /// Find a city with the same (name, region, country), ignoring `exclude`.
    fn find_duplicate(
        &self,
        city: &CityRequest,
        exclude: Option<CityId>,
    ) -> impl std::future::Future<Output = Result<Option<City>, RepositoryError>> + Send;

    /// Replace every field of an existing city. Returns the updated city.
    fn update(
        &self,
        id: CityId,
        city: &CityRequest,
    ) -> impl std::future::Future<Output = Result<City, RepositoryError>> + Send;

    fn delete(
        &self,
        id: CityId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Number of students and tutors that live in the city.
    fn count_residents(
        &self,
        id: CityId,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;
}
