//! Tutor offers: which subject a tutor teaches at which level, and for how much.

use tutorhub_types::error::{CatalogError, RepositoryError};
use tutorhub_types::id::{LevelId, SubjectId, TutorId, TutorSubjectId};
use tutorhub_types::tutor_subject::{
    CreateTutorSubjectRequest, TutorPricing, TutorSubject, UpdateTutorSubjectRequest,
};

use crate::repository::subject::SubjectRepository;
use crate::repository::teaching_level::TeachingLevelRepository;
use crate::repository::tutor::TutorRepository;
use crate::repository::tutor_subject::TutorSubjectRepository;

const DUPLICATE_OFFER: &str = "Tutor already offers this subject at the specified level";

fn storage(e: RepositoryError) -> CatalogError {
    CatalogError::StorageError(e.to_string())
}

pub struct TutorSubjectService<TS, T, Su, L>
where
    TS: TutorSubjectRepository,
    T: TutorRepository,
    Su: SubjectRepository,
    L: TeachingLevelRepository,
{
    offers: TS,
    tutors: T,
    subjects: Su,
    levels: L,
}

impl<TS, T, Su, L> TutorSubjectService<TS, T, Su, L>
where
    TS: TutorSubjectRepository,
    T: TutorRepository,
    Su: SubjectRepository,
    L: TeachingLevelRepository,
{
    pub fn new(offers: TS, tutors: T, subjects: Su, levels: L) -> Self {
        Self {
            offers,
            tutors,
            subjects,
            levels,
        }
    }

    pub async fn create(
        &self,
        request: CreateTutorSubjectRequest,
    ) -> Result<TutorSubject, CatalogError> {
        let tutor_id = TutorId(request.tutor_id);
        let subject_id = SubjectId(request.subject_id);
        let level_id = LevelId(request.level_id);

        if self.tutors.get_by_id(tutor_id).await.map_err(storage)?.is_none() {
            return Err(CatalogError::NotFound(format!(
                "Tutor with id {tutor_id} not found"
            )));
        }
        if self.subjects.get_by_id(subject_id).await.map_err(storage)?.is_none() {
            return Err(CatalogError::NotFound(format!(
                "Subject with id {subject_id} not found"
            )));
        }
        if self.levels.get_by_id(level_id).await.map_err(storage)?.is_none() {
            return Err(CatalogError::NotFound(format!(
                "Teaching level with id {level_id} not found"
            )));
        }

        if self
            .offers
            .find(tutor_id, subject_id, level_id)
            .await
            .map_err(storage)?
            .is_some()
        {
            return Err(CatalogError::Duplicate(DUPLICATE_OFFER.to_string()));
        }

        let offer = self.offers.create(&request).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => CatalogError::Duplicate(DUPLICATE_OFFER.to_string()),
            other => storage(other),
        })?;

        tracing::info!(
            tutor_subject_id = %offer.id,
            tutor_id = %tutor_id,
            rate = %offer.hourly_rate,
            "tutor subject created"
        );
        Ok(offer)
    }

    /// Change the hourly rate. Refused while pending or confirmed bookings
    /// were made at the current rate.
    pub async fn update(
        &self,
        id: TutorSubjectId,
        request: UpdateTutorSubjectRequest,
    ) -> Result<TutorSubject, CatalogError> {
        let existing = self.get(id).await?;

        let active = self.offers.count_bookings(id, true).await.map_err(storage)?;
        if active > 0 {
            return Err(CatalogError::InUse(
                "Cannot update hourly rate while there are active bookings".to_string(),
            ));
        }

        let offer = self
            .offers
            .update_rate(id, request.hourly_rate)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => not_found(id),
                other => storage(other),
            })?;

        tracing::info!(
            tutor_subject_id = %id,
            from = %existing.hourly_rate,
            to = %offer.hourly_rate,
            "hourly rate changed"
        );
        Ok(offer)
    }

    pub async fn delete(&self, id: TutorSubjectId) -> Result<(), CatalogError> {
        self.get(id).await?;

        let bookings = self.offers.count_bookings(id, false).await.map_err(storage)?;
        if bookings > 0 {
            return Err(CatalogError::InUse(
                "Cannot delete tutor-subject entries that have bookings".to_string(),
            ));
        }

        self.offers.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => not_found(id),
            other => storage(other),
        })?;
        tracing::info!(tutor_subject_id = %id, "tutor subject deleted");
        Ok(())
    }

    pub async fn get(&self, id: TutorSubjectId) -> Result<TutorSubject, CatalogError> {
        self.offers
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found(id))
    }

    pub async fn list(&self) -> Result<Vec<TutorSubject>, CatalogError> {
        self.offers.list().await.map_err(storage)
    }

    pub async fn by_tutor(&self, tutor_id: TutorId) -> Result<Vec<TutorSubject>, CatalogError> {
        self.offers.list_by_tutor(tutor_id).await.map_err(storage)
    }

    pub async fn by_subject(
        &self,
        subject_id: SubjectId,
    ) -> Result<Vec<TutorSubject>, CatalogError> {
        self.offers.list_by_subject(subject_id).await.map_err(storage)
    }

    pub async fn by_level(&self, level_id: LevelId) -> Result<Vec<TutorSubject>, CatalogError> {
        self.offers.list_by_level(level_id).await.map_err(storage)
    }

    pub async fn pricing_statistics(&self) -> Result<Vec<TutorPricing>, CatalogError> {
        self.offers.pricing_statistics().await.map_err(storage)
    }
}

fn not_found(id: TutorSubjectId) -> CatalogError {
    CatalogError::NotFound(format!("Tutor subject with id {id} not found"))
}
