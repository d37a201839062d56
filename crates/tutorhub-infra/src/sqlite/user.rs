//! SQLite user lookups and the user-row mapping shared by the student and
//! tutor repositories.

use sqlx::Row;
use tutorhub_core::repository::user::UserRepository;
use chrono::{DateTime, Utc};
use tutorhub_types::account::{CreateUserRequest, UpdateUserRequest, User, UserType};
use tutorhub_types::error::RepositoryError;
use tutorhub_types::id::UserId;

use super::pool::DatabasePool;
use super::{format_date, format_datetime, parse_date, parse_datetime, query_err};

/// Columns of `users` selected alongside a profile table aliased `u`.
pub(crate) const USER_COLUMNS: &str = "u.first_name, u.last_name, u.email, u.phone, u.user_type, \
     u.date_of_birth, u.registration_date";

/// Internal row type for mapping the user columns of a row to a domain `User`.
struct UserRow {
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    user_type: String,
    date_of_birth: Option<String>,
    registration_date: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            user_type: row.try_get("user_type")?,
            date_of_birth: row.try_get("date_of_birth")?,
            registration_date: row.try_get("registration_date")?,
        })
    }

    fn into_user(self, id: UserId) -> Result<User, RepositoryError> {
        let user_type: UserType = self
            .user_type
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            user_type,
            date_of_birth: self.date_of_birth.as_deref().map(parse_date).transpose()?,
            registration_date: parse_datetime(&self.registration_date)?,
        })
    }
}

/// Map the user columns of `row` (see [`USER_COLUMNS`]) to a `User`.
pub(crate) fn user_from_row(
    row: &sqlx::sqlite::SqliteRow,
    id: UserId,
) -> Result<User, RepositoryError> {
    UserRow::from_row(row).map_err(query_err)?.into_user(id)
}

/// Translate a failed user-row write into a conflict naming the column.
pub(crate) fn user_write_err(e: sqlx::Error) -> RepositoryError {
    if super::is_unique_violation(&e, Some("users.email")) {
        RepositoryError::Conflict("users.email already exists".to_string())
    } else if super::is_unique_violation(&e, Some("users.phone")) {
        RepositoryError::Conflict("users.phone already exists".to_string())
    } else {
        query_err(e)
    }
}

/// Insert the user row of a new account inside the caller's transaction.
/// Returns the new user id.
pub(crate) async fn insert_user(
    conn: &mut sqlx::SqliteConnection,
    user: &CreateUserRequest,
    registered_at: DateTime<Utc>,
) -> Result<UserId, RepositoryError> {
    let done = sqlx::query(
        "INSERT INTO users (first_name, last_name, email, phone, user_type, date_of_birth, registration_date)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.email)
    .bind(&user.phone)
    .bind(user.user_type.to_string())
    .bind(user.date_of_birth.map(format_date))
    .bind(format_datetime(&registered_at))
    .execute(&mut *conn)
    .await
    .map_err(user_write_err)?;

    Ok(UserId(done.last_insert_rowid()))
}

/// Rewrite the editable user columns inside the caller's transaction.
pub(crate) async fn update_user(
    conn: &mut sqlx::SqliteConnection,
    id: UserId,
    user: &UpdateUserRequest,
) -> Result<(), RepositoryError> {
    let done = sqlx::query(
        "UPDATE users SET first_name = ?, last_name = ?, email = ?, phone = ? WHERE id = ?",
    )
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.email)
    .bind(&user.phone)
    .bind(id.get())
    .execute(&mut *conn)
    .await
    .map_err(user_write_err)?;

    if done.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

/// Delete a user row; the profile and everything below it cascade.
pub(crate) async fn delete_user(pool: &DatabasePool, id: UserId) -> Result<(), RepositoryError> {
    let done = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id.get())
        .execute(&pool.writer)
        .await
        .map_err(query_err)?;

    if done.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn find_by(&self, column: &str, value: &str) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT u.id, {USER_COLUMNS} FROM users u WHERE u.{column} = ?");
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        match row {
            Some(row) => {
                let id = UserId(row.try_get("id").map_err(query_err)?);
                Ok(Some(user_from_row(&row, id)?))
            }
            None => Ok(None),
        }
    }
}

impl UserRepository for SqliteUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        self.find_by("email", email).await
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, RepositoryError> {
        self.find_by("phone", phone).await
    }
}
