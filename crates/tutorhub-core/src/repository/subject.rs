//! Subject repository trait definition.

use tutorhub_types::catalog::{Subject, SubjectRequest};
use tutorhub_types::error::RepositoryError;
use tutorhub_types::id::SubjectId;

pub trait SubjectRepository: Send + Sync {
    /// Insert a subject. A duplicate name yields `RepositoryError::Conflict`.
    fn create(
        &self,
        subject: &SubjectRequest,
    ) -> impl std::future::Future<Output = Result<Subject, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: SubjectId,
    ) -> impl std::future::Future<Output = Result<Option<Subject>, RepositoryError>> + Send;

    fn get_by_name(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Option<Subject>, RepositoryError>> + Send;

    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Subject>, RepositoryError>> + Send;

    /// Subjects in a category, ordered by name.
    fn list_by_category(
        &self,
        category: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Subject>, RepositoryError>> + Send;

    fn update(
        &self,
        id: SubjectId,
        subject: &SubjectRequest,
    ) -> impl std::future::Future<Output = Result<Subject, RepositoryError>> + Send;

    fn delete(
        &self,
        id: SubjectId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Number of tutor offers that teach this subject.
    fn count_offers(
        &self,
        id: SubjectId,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;
}
