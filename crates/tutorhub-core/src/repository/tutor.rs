//! Tutor repository trait definition.

use chrono::{DateTime, Utc};
use tutorhub_types::account::{
    CreateTutorRequest, Tutor, TutorRating, TutorSearchCriteria, UpdateTutorRequest,
};
use tutorhub_types::error::RepositoryError;
use tutorhub_types::id::{CityId, TutorId};
use tutorhub_types::page::PageRequest;

use super::SortOrder;

/// Column the paginated tutor listing sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TutorSort {
    Experience,
    Name,
    #[default]
    Id,
}

impl std::str::FromStr for TutorSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "experience" | "yearsexperience" | "years_experience" => Ok(TutorSort::Experience),
            "name" | "lastname" | "last_name" => Ok(TutorSort::Name),
            "id" => Ok(TutorSort::Id),
            other => Err(format!(
                "invalid sort field '{other}', expected experience, name or id"
            )),
        }
    }
}

/// Rows that disappear with a tutor through cascading deletes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TutorFootprint {
    pub schedules: i64,
    pub offers: i64,
    pub bookings: i64,
}

pub trait TutorRepository: Send + Sync {
    /// Insert the user row and the tutor row in one transaction.
    fn create(
        &self,
        request: &CreateTutorRequest,
        registered_at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<Tutor, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: TutorId,
    ) -> impl std::future::Future<Output = Result<Option<Tutor>, RepositoryError>> + Send;

    fn list(&self)
    -> impl std::future::Future<Output = Result<Vec<Tutor>, RepositoryError>> + Send;

    fn list_by_city(
        &self,
        city_id: CityId,
    ) -> impl std::future::Future<Output = Result<Vec<Tutor>, RepositoryError>> + Send;

    /// One sorted page of tutors plus the total count.
    fn page(
        &self,
        sort: TutorSort,
        order: SortOrder,
        page: PageRequest,
    ) -> impl std::future::Future<Output = Result<(Vec<Tutor>, i64), RepositoryError>> + Send;

    /// Tutors matching every given criterion. Price bounds match when any
    /// of the tutor's offers falls inside them.
    fn search(
        &self,
        criteria: &TutorSearchCriteria,
    ) -> impl std::future::Future<Output = Result<Vec<Tutor>, RepositoryError>> + Send;

    /// Reviewed tutors by average rating, best first.
    fn top_rated(
        &self,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<TutorRating>, RepositoryError>> + Send;

    fn update(
        &self,
        id: TutorId,
        request: &UpdateTutorRequest,
    ) -> impl std::future::Future<Output = Result<Tutor, RepositoryError>> + Send;

    fn delete(
        &self,
        id: TutorId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn footprint(
        &self,
        id: TutorId,
    ) -> impl std::future::Future<Output = Result<TutorFootprint, RepositoryError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parse() {
        assert_eq!("Experience".parse::<TutorSort>().unwrap(), TutorSort::Experience);
        assert_eq!("name".parse::<TutorSort>().unwrap(), TutorSort::Name);
        assert_eq!("ID".parse::<TutorSort>().unwrap(), TutorSort::Id);
        assert!("rating".parse::<TutorSort>().is_err());
    }
}
