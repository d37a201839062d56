//! Checks shared by the student and tutor services.

use chrono::NaiveDate;
use tutorhub_types::error::{AccountError, RepositoryError};
use tutorhub_types::id::{CityId, UserId};

use crate::repository::city::CityRepository;
use crate::repository::user::UserRepository;

pub(crate) fn storage(e: RepositoryError) -> AccountError {
    AccountError::StorageError(e.to_string())
}

/// Email and phone must not belong to any other user.
pub(crate) async fn check_contacts<U: UserRepository>(
    users: &U,
    email: &str,
    phone: Option<&str>,
    exclude: Option<UserId>,
) -> Result<(), AccountError> {
    let taken_by_other = |owner: UserId| exclude != Some(owner);

    if let Some(owner) = users.find_by_email(email).await.map_err(storage)? {
        if taken_by_other(owner.id) {
            return Err(AccountError::EmailTaken(email.to_string()));
        }
    }

    if let Some(phone) = phone {
        if let Some(owner) = users.find_by_phone(phone).await.map_err(storage)? {
            if taken_by_other(owner.id) {
                return Err(AccountError::PhoneTaken(phone.to_string()));
            }
        }
    }
    Ok(())
}

/// Resolve an optional city reference, failing when it points nowhere.
pub(crate) async fn check_city<Ci: CityRepository>(
    cities: &Ci,
    city_id: Option<i64>,
) -> Result<Option<CityId>, AccountError> {
    let Some(raw) = city_id else {
        return Ok(None);
    };
    let id = CityId(raw);
    match cities.get_by_id(id).await.map_err(storage)? {
        Some(_) => Ok(Some(id)),
        None => Err(AccountError::CityMissing(id)),
    }
}

pub(crate) fn check_birth_date(
    date_of_birth: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(), AccountError> {
    match date_of_birth {
        Some(dob) if dob >= today => Err(AccountError::BirthDateNotPast),
        _ => Ok(()),
    }
}

/// Translate a unique-constraint failure on the user table.
pub(crate) fn contact_conflict(
    e: RepositoryError,
    email: &str,
    phone: Option<&str>,
) -> AccountError {
    match e {
        RepositoryError::Conflict(msg) if msg.contains("phone") => {
            AccountError::PhoneTaken(phone.unwrap_or_default().to_string())
        }
        RepositoryError::Conflict(_) => AccountError::EmailTaken(email.to_string()),
        other => storage(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_birth_date_must_be_past() {
        let today = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        assert!(check_birth_date(None, today).is_ok());
        assert!(check_birth_date(NaiveDate::from_ymd_opt(2010, 1, 1), today).is_ok());
        assert!(matches!(
            check_birth_date(Some(today), today),
            Err(AccountError::BirthDateNotPast)
        ));
    }

    #[test]
    fn test_contact_conflict_mapping() {
        let err = contact_conflict(
            RepositoryError::Conflict("UNIQUE constraint failed: users.phone".into()),
            "a@b.com",
            Some("+380501234567"),
        );
        assert_eq!(err.to_string(), "User with phone +380501234567 already exists");

        let err = contact_conflict(
            RepositoryError::Conflict("UNIQUE constraint failed: users.email".into()),
            "a@b.com",
            None,
        );
        assert_eq!(err.to_string(), "User with email a@b.com already exists");
    }
}
