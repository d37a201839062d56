//! Lookups on the shared user table, used for contact uniqueness checks.

use tutorhub_types::account::User;
use tutorhub_types::error::RepositoryError;

pub trait UserRepository: Send + Sync {
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    fn find_by_phone(
        &self,
        phone: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;
}
