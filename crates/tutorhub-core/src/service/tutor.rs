//! Tutor accounts: registration, profile edits, search and rankings.

use tutorhub_types::account::{
    CreateTutorRequest, Tutor, TutorDetails, TutorRating, TutorSearchCriteria, UpdateTutorRequest,
    UserType,
};
use tutorhub_types::error::{AccountError, RepositoryError};
use tutorhub_types::id::{CityId, TutorId, UserId};
use tutorhub_types::page::{Page, PageRequest};

use crate::clock::Clock;
use crate::repository::SortOrder;
use crate::repository::city::CityRepository;
use crate::repository::tutor::{TutorRepository, TutorSort};
use crate::repository::user::UserRepository;
use crate::service::account::{
    check_birth_date, check_city, check_contacts, contact_conflict, storage,
};

/// Upper bound for `top_rated`.
pub const MAX_TOP_RATED: i64 = 100;

pub struct TutorService<T, U, Ci, C>
where
    T: TutorRepository,
    U: UserRepository,
    Ci: CityRepository,
    C: Clock,
{
    tutors: T,
    users: U,
    cities: Ci,
    clock: C,
}

impl<T, U, Ci, C> TutorService<T, U, Ci, C>
where
    T: TutorRepository,
    U: UserRepository,
    Ci: CityRepository,
    C: Clock,
{
    pub fn new(tutors: T, users: U, cities: Ci, clock: C) -> Self {
        Self {
            tutors,
            users,
            cities,
            clock,
        }
    }

    /// City and format rules for the tutor-specific part of a request.
    async fn check_details(&self, details: &TutorDetails) -> Result<Option<CityId>, AccountError> {
        let city_id = check_city(&self.cities, details.city_id).await?;
        if details.offline_available && (city_id.is_none() || details.address.is_none()) {
            return Err(AccountError::OfflineRequiresLocation);
        }
        if !details.online_available && !details.offline_available {
            return Err(AccountError::NoFormatAvailable);
        }
        Ok(city_id)
    }

    /// Register a tutor: the user row and the tutor row are written together.
    pub async fn create(&self, request: CreateTutorRequest) -> Result<Tutor, AccountError> {
        if request.user.user_type != UserType::Tutor {
            return Err(AccountError::WrongUserType {
                expected: UserType::Tutor,
                role: "tutor",
            });
        }

        let email = request.user.email.as_str();
        let phone = request.user.phone.as_deref();
        check_contacts(&self.users, email, phone, None).await?;
        self.check_details(&request.details).await?;
        check_birth_date(request.user.date_of_birth, self.clock.today())?;

        let tutor = self
            .tutors
            .create(&request, self.clock.now())
            .await
            .map_err(|e| contact_conflict(e, email, phone))?;

        tracing::info!(tutor_id = %tutor.id, "tutor registered");
        Ok(tutor)
    }

    pub async fn update(
        &self,
        id: TutorId,
        request: UpdateTutorRequest,
    ) -> Result<Tutor, AccountError> {
        self.get(id).await?;

        let email = request.user.email.as_str();
        let phone = request.user.phone.as_deref();
        check_contacts(&self.users, email, phone, Some(UserId::from(id))).await?;
        self.check_details(&request.details).await?;

        let tutor = self
            .tutors
            .update(id, &request)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => not_found(id),
                other => contact_conflict(other, email, phone),
            })?;

        tracing::info!(tutor_id = %id, "tutor updated");
        Ok(tutor)
    }

    /// Delete a tutor together with everything hanging off the account.
    pub async fn delete(&self, id: TutorId) -> Result<(), AccountError> {
        self.get(id).await?;

        let footprint = self.tutors.footprint(id).await.map_err(storage)?;
        if footprint.schedules > 0 || footprint.offers > 0 {
            tracing::warn!(
                tutor_id = %id,
                schedules = footprint.schedules,
                offers = footprint.offers,
                bookings = footprint.bookings,
                "deleting tutor cascades to dependent rows"
            );
        }

        self.tutors.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => not_found(id),
            other => storage(other),
        })?;
        tracing::info!(tutor_id = %id, "tutor deleted");
        Ok(())
    }

    pub async fn get(&self, id: TutorId) -> Result<Tutor, AccountError> {
        self.tutors
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found(id))
    }

    pub async fn list(&self) -> Result<Vec<Tutor>, AccountError> {
        self.tutors.list().await.map_err(storage)
    }

    pub async fn by_city(&self, city_id: CityId) -> Result<Vec<Tutor>, AccountError> {
        self.tutors.list_by_city(city_id).await.map_err(storage)
    }

    pub async fn paginated(
        &self,
        page: PageRequest,
        sort: TutorSort,
        descending: bool,
    ) -> Result<Page<Tutor>, AccountError> {
        let (items, total) = self
            .tutors
            .page(sort, SortOrder::from_descending(descending), page)
            .await
            .map_err(storage)?;
        Ok(Page::new(items, page, total))
    }

    pub async fn search(&self, criteria: &TutorSearchCriteria) -> Result<Vec<Tutor>, AccountError> {
        self.tutors.search(criteria).await.map_err(storage)
    }

    /// The `count` best-rated tutors that have at least one review.
    pub async fn top_rated(&self, count: i64) -> Result<Vec<TutorRating>, AccountError> {
        if !(1..=MAX_TOP_RATED).contains(&count) {
            return Err(AccountError::InvalidArgument(format!(
                "Count must be between 1 and {MAX_TOP_RATED}"
            )));
        }
        self.tutors.top_rated(count).await.map_err(storage)
    }
}

fn not_found(id: TutorId) -> AccountError {
    AccountError::NotFound(format!("Tutor with id {id} not found"))
}
