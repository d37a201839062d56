//! Student repository trait definition.

use chrono::{DateTime, Utc};
use tutorhub_types::account::{CreateStudentRequest, Student, UpdateStudentRequest};
use tutorhub_types::error::RepositoryError;
use tutorhub_types::id::{CityId, StudentId};
use tutorhub_types::page::PageRequest;

/// Filter criteria for the paginated student listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StudentFilter {
    pub city_id: Option<CityId>,
    pub school_grade: Option<i16>,
}

/// Implementations keep the user row and the student row in step: both
/// writes happen in one transaction.
pub trait StudentRepository: Send + Sync {
    fn create(
        &self,
        request: &CreateStudentRequest,
        registered_at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<Student, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: StudentId,
    ) -> impl std::future::Future<Output = Result<Option<Student>, RepositoryError>> + Send;

    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Student>, RepositoryError>> + Send;

    fn list_by_city(
        &self,
        city_id: CityId,
    ) -> impl std::future::Future<Output = Result<Vec<Student>, RepositoryError>> + Send;

    /// One page of students ordered by id, plus the total matching count.
    fn page(
        &self,
        filter: StudentFilter,
        page: PageRequest,
    ) -> impl std::future::Future<Output = Result<(Vec<Student>, i64), RepositoryError>> + Send;

    fn update(
        &self,
        id: StudentId,
        request: &UpdateStudentRequest,
    ) -> impl std::future::Future<Output = Result<Student, RepositoryError>> + Send;

    /// Delete the underlying user; the student row and bookings cascade.
    fn delete(
        &self,
        id: StudentId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
