//! Teaching level repository trait definition.

use tutorhub_types::catalog::{TeachingLevel, TeachingLevelRequest};
use tutorhub_types::error::RepositoryError;
use tutorhub_types::id::LevelId;

pub trait TeachingLevelRepository: Send + Sync {
    fn create(
        &self,
        level: &TeachingLevelRequest,
    ) -> impl std::future::Future<Output = Result<TeachingLevel, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: LevelId,
    ) -> impl std::future::Future<Output = Result<Option<TeachingLevel>, RepositoryError>> + Send;

    fn get_by_name(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Option<TeachingLevel>, RepositoryError>> + Send;

    fn get_by_position(
        &self,
        position: i32,
    ) -> impl std::future::Future<Output = Result<Option<TeachingLevel>, RepositoryError>> + Send;

    /// All levels ordered by id.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<TeachingLevel>, RepositoryError>> + Send;

    /// All levels ordered by position.
    fn list_by_position(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<TeachingLevel>, RepositoryError>> + Send;

    fn update(
        &self,
        id: LevelId,
        level: &TeachingLevelRequest,
    ) -> impl std::future::Future<Output = Result<TeachingLevel, RepositoryError>> + Send;

    fn delete(
        &self,
        id: LevelId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn count_offers(
        &self,
        id: LevelId,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;
}
