//! Student accounts.

use tutorhub_types::account::{CreateStudentRequest, Student, UpdateStudentRequest, UserType};
use tutorhub_types::error::{AccountError, RepositoryError};
use tutorhub_types::id::{CityId, StudentId, UserId};
use tutorhub_types::page::{Page, PageRequest};

use crate::clock::Clock;
use crate::repository::city::CityRepository;
use crate::repository::student::{StudentFilter, StudentRepository};
use crate::repository::user::UserRepository;
use crate::service::account::{
    check_birth_date, check_city, check_contacts, contact_conflict, storage,
};

pub struct StudentService<St, U, Ci, C>
where
    St: StudentRepository,
    U: UserRepository,
    Ci: CityRepository,
    C: Clock,
{
    students: St,
    users: U,
    cities: Ci,
    clock: C,
}

impl<St, U, Ci, C> StudentService<St, U, Ci, C>
where
    St: StudentRepository,
    U: UserRepository,
    Ci: CityRepository,
    C: Clock,
{
    pub fn new(students: St, users: U, cities: Ci, clock: C) -> Self {
        Self {
            students,
            users,
            cities,
            clock,
        }
    }

    pub async fn create(&self, request: CreateStudentRequest) -> Result<Student, AccountError> {
        if request.user.user_type != UserType::Student {
            return Err(AccountError::WrongUserType {
                expected: UserType::Student,
                role: "student",
            });
        }

        let email = request.user.email.as_str();
        let phone = request.user.phone.as_deref();
        check_contacts(&self.users, email, phone, None).await?;
        check_city(&self.cities, request.details.city_id).await?;
        check_birth_date(request.user.date_of_birth, self.clock.today())?;

        let student = self
            .students
            .create(&request, self.clock.now())
            .await
            .map_err(|e| contact_conflict(e, email, phone))?;

        tracing::info!(student_id = %student.id, "student registered");
        Ok(student)
    }

    pub async fn update(
        &self,
        id: StudentId,
        request: UpdateStudentRequest,
    ) -> Result<Student, AccountError> {
        self.get(id).await?;

        let email = request.user.email.as_str();
        let phone = request.user.phone.as_deref();
        check_contacts(&self.users, email, phone, Some(UserId::from(id))).await?;
        check_city(&self.cities, request.details.city_id).await?;

        let student = self
            .students
            .update(id, &request)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => not_found(id),
                other => contact_conflict(other, email, phone),
            })?;

        tracing::info!(student_id = %id, "student updated");
        Ok(student)
    }

    pub async fn delete(&self, id: StudentId) -> Result<(), AccountError> {
        self.get(id).await?;
        self.students.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => not_found(id),
            other => storage(other),
        })?;
        tracing::info!(student_id = %id, "student deleted");
        Ok(())
    }

    pub async fn get(&self, id: StudentId) -> Result<Student, AccountError> {
        self.students
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found(id))
    }

    pub async fn list(&self) -> Result<Vec<Student>, AccountError> {
        self.students.list().await.map_err(storage)
    }

    pub async fn by_city(&self, city_id: CityId) -> Result<Vec<Student>, AccountError> {
        self.students.list_by_city(city_id).await.map_err(storage)
    }

    pub async fn paginated(
        &self,
        page: PageRequest,
        filter: StudentFilter,
    ) -> Result<Page<Student>, AccountError> {
        let (items, total) = self
            .students
            .page(filter, page)
            .await
            .map_err(storage)?;
        Ok(Page::new(items, page, total))
    }
}

fn not_found(id: StudentId) -> AccountError {
    AccountError::NotFound(format!("Student with id {id} not found"))
}
