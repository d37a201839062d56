//! Tutor subject (offer) repository trait definition.

use tutorhub_types::error::RepositoryError;
use tutorhub_types::id::{LevelId, SubjectId, TutorId, TutorSubjectId};
use tutorhub_types::money::HourlyRate;
use tutorhub_types::tutor_subject::{CreateTutorSubjectRequest, TutorPricing, TutorSubject};

pub trait TutorSubjectRepository: Send + Sync {
    /// Insert an offer. A repeated (tutor, subject, level) triple yields
    /// `RepositoryError::Conflict`.
    fn create(
        &self,
        request: &CreateTutorSubjectRequest,
    ) -> impl std::future::Future<Output = Result<TutorSubject, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: TutorSubjectId,
    ) -> impl std::future::Future<Output = Result<Option<TutorSubject>, RepositoryError>> + Send;

    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<TutorSubject>, RepositoryError>> + Send;

    fn list_by_tutor(
        &self,
        tutor_id: TutorId,
    ) -> impl std::future::Future<Output = Result<Vec<TutorSubject>, RepositoryError>> + Send;

    fn list_by_subject(
        &self,
        subject_id: SubjectId,
    ) -> impl std::future::Future<Output = Result<Vec<TutorSubject>, RepositoryError>> + Send;

    fn list_by_level(
        &self,
        level_id: LevelId,
    ) -> impl std::future::Future<Output = Result<Vec<TutorSubject>, RepositoryError>> + Send;

    fn find(
        &self,
        tutor_id: TutorId,
        subject_id: SubjectId,
        level_id: LevelId,
    ) -> impl std::future::Future<Output = Result<Option<TutorSubject>, RepositoryError>> + Send;

    fn update_rate(
        &self,
        id: TutorSubjectId,
        rate: HourlyRate,
    ) -> impl std::future::Future<Output = Result<TutorSubject, RepositoryError>> + Send;

    fn delete(
        &self,
        id: TutorSubjectId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Bookings made against this offer. With `active_only`, only pending
    /// and confirmed ones count.
    fn count_bookings(
        &self,
        id: TutorSubjectId,
        active_only: bool,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;

    /// Min, max and average rate per tutor, ordered by tutor id.
    fn pricing_statistics(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<TutorPricing>, RepositoryError>> + Send;
}
