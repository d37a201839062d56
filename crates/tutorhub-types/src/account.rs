//! User accounts and the two profile kinds built on them: students and tutors.
//!
//! A student or tutor shares its id with the underlying user row. Requests
//! carry the user part nested under `user` and the profile fields inline.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use std::fmt;
use std::str::FromStr;

use crate::booking::BookingFormat;
use crate::id::{CityId, StudentId, TutorId, UserId};
use crate::money::HourlyRate;
use crate::validation::{PERSON_NAME, PHONE, blank_as_none, rule};

/// Which profile a user account backs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[serde(alias = "Student")]
    Student,
    #[serde(alias = "Tutor")]
    Tutor,
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserType::Student => write!(f, "student"),
            UserType::Tutor => write!(f, "tutor"),
        }
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(UserType::Student),
            "tutor" => Ok(UserType::Tutor),
            other => Err(format!("invalid user type: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub user_type: UserType,
    pub date_of_birth: Option<NaiveDate>,
    pub registration_date: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub city_id: Option<CityId>,
    pub school_grade: Option<i16>,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tutor {
    pub id: TutorId,
    pub city_id: Option<CityId>,
    pub years_experience: i16,
    pub education: String,
    pub about_me: Option<String>,
    pub online_available: bool,
    pub offline_available: bool,
    pub address: Option<String>,
    pub user: User,
}

impl Tutor {
    /// Whether this tutor teaches in the given delivery format.
    pub fn supports(&self, format: BookingFormat) -> bool {
        match format {
            BookingFormat::Online => self.online_available,
            BookingFormat::Offline => self.offline_available,
        }
    }
}

/// A tutor together with the aggregate of the reviews left on their sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TutorRating {
    pub tutor: Tutor,
    pub average_rating: f64,
    pub review_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(min = 1, max = 100, message = "First name must be between 1 and 100 characters"),
        regex(path = *PERSON_NAME, message = "First name can only contain letters, apostrophes and hyphens")
    )]
    pub first_name: String,

    #[validate(
        length(min = 1, max = 100, message = "Last name must be between 1 and 100 characters"),
        regex(path = *PERSON_NAME, message = "Last name can only contain letters, apostrophes and hyphens")
    )]
    pub last_name: String,

    #[validate(
        length(max = 255, message = "Email cannot be longer than 255 characters"),
        email(message = "Invalid email address")
    )]
    pub email: String,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        length(max = 20, message = "Phone number cannot be longer than 20 characters"),
        regex(path = *PHONE, message = "Invalid phone number format")
    )]
    pub phone: Option<String>,

    pub user_type: UserType,

    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(
        length(min = 1, max = 100, message = "First name must be between 1 and 100 characters"),
        regex(path = *PERSON_NAME, message = "First name can only contain letters, apostrophes and hyphens")
    )]
    pub first_name: String,

    #[validate(
        length(min = 1, max = 100, message = "Last name must be between 1 and 100 characters"),
        regex(path = *PERSON_NAME, message = "Last name can only contain letters, apostrophes and hyphens")
    )]
    pub last_name: String,

    #[validate(
        length(max = 255, message = "Email cannot be longer than 255 characters"),
        email(message = "Invalid email address")
    )]
    pub email: String,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        length(max = 20, message = "Phone number cannot be longer than 20 characters"),
        regex(path = *PHONE, message = "Invalid phone number format")
    )]
    pub phone: Option<String>,
}

/// Student-specific fields shared by create and update bodies.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct StudentDetails {
    #[serde(default)]
    #[validate(range(min = 1, message = "CityId must be greater than 0"))]
    pub city_id: Option<i64>,

    #[serde(default)]
    #[validate(range(min = 1, max = 11, message = "SchoolGrade must be between 1 and 11"))]
    pub school_grade: Option<i16>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateStudentRequest {
    #[validate(nested)]
    pub user: CreateUserRequest,

    #[serde(flatten)]
    #[validate(nested)]
    pub details: StudentDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateStudentRequest {
    #[validate(nested)]
    pub user: UpdateUserRequest,

    #[serde(flatten)]
    #[validate(nested)]
    pub details: StudentDetails,
}

/// Tutor-specific fields shared by create and update bodies.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "check_tutor_formats"))]
pub struct TutorDetails {
    #[serde(default)]
    #[validate(range(min = 1, message = "City ID must be a positive number"))]
    pub city_id: Option<i64>,

    #[validate(range(min = 0, max = 80, message = "Years of experience must be between 0 and 80"))]
    pub years_experience: i16,

    #[validate(length(min = 1, max = 2000, message = "Education must be between 1 and 2000 characters"))]
    pub education: String,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 2000, message = "About Me section cannot exceed 2000 characters"))]
    pub about_me: Option<String>,

    #[serde(default)]
    pub online_available: bool,

    #[serde(default)]
    pub offline_available: bool,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 500, message = "Address cannot exceed 500 characters"))]
    pub address: Option<String>,
}

fn check_tutor_formats(details: &TutorDetails) -> Result<(), ValidationError> {
    if !details.online_available && !details.offline_available {
        return Err(rule(
            "format_required",
            "At least one of online or offline availability must be true",
        ));
    }
    if details.offline_available && details.address.is_none() {
        return Err(rule(
            "address_required",
            "Address is required when offline availability is true",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTutorRequest {
    #[validate(nested)]
    pub user: CreateUserRequest,

    #[serde(flatten)]
    #[validate(nested)]
    pub details: TutorDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateTutorRequest {
    #[validate(nested)]
    pub user: UpdateUserRequest,

    #[serde(flatten)]
    #[validate(nested)]
    pub details: TutorDetails,
}

/// Filters for `POST /tutors/search`. Every criterion is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "check_price_range"))]
pub struct TutorSearchCriteria {
    #[serde(default)]
    #[validate(range(min = 1, message = "City ID must be a positive number"))]
    pub city_id: Option<i64>,

    #[serde(default)]
    #[validate(range(min = 1, message = "Subject ID must be a positive number"))]
    pub subject_id: Option<i64>,

    #[serde(default)]
    #[validate(range(min = 1, message = "Level ID must be a positive number"))]
    pub level_id: Option<i64>,

    #[serde(default)]
    pub min_price: Option<HourlyRate>,

    #[serde(default)]
    pub max_price: Option<HourlyRate>,

    #[serde(default)]
    pub online_only: bool,

    #[serde(default)]
    pub offline_only: bool,
}

fn check_price_range(criteria: &TutorSearchCriteria) -> Result<(), ValidationError> {
    if criteria.min_price.is_some_and(|p| p.cents() < 0) {
        return Err(rule("min_price", "Minimum price must be a non-negative number"));
    }
    if criteria.max_price.is_some_and(|p| p.cents() < 0) {
        return Err(rule("max_price", "Maximum price must be a non-negative number"));
    }
    if let (Some(min), Some(max)) = (criteria.min_price, criteria.max_price) {
        if min > max {
            return Err(rule(
                "price_range",
                "Minimum price cannot be greater than maximum price",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::collect_messages;

    fn user() -> CreateUserRequest {
        CreateUserRequest {
            first_name: "Олена".to_string(),
            last_name: "Коваль".to_string(),
            email: "olena@example.com".to_string(),
            phone: Some("+380501234567".to_string()),
            user_type: UserType::Tutor,
            date_of_birth: None,
        }
    }

    fn details() -> TutorDetails {
        TutorDetails {
            city_id: Some(1),
            years_experience: 5,
            education: "MSc Mathematics".to_string(),
            about_me: None,
            online_available: true,
            offline_available: false,
            address: None,
        }
    }

    #[test]
    fn test_valid_tutor_request() {
        let req = CreateTutorRequest {
            user: user(),
            details: details(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_tutor_needs_a_format() {
        let mut d = details();
        d.online_available = false;
        let req = CreateTutorRequest {
            user: user(),
            details: d,
        };
        let messages = collect_messages(&req.validate().unwrap_err());
        assert!(messages.contains(
            &"At least one of online or offline availability must be true".to_string()
        ));
    }

    #[test]
    fn test_offline_tutor_needs_address() {
        let mut d = details();
        d.offline_available = true;
        assert!(d.validate().is_err());
        d.address = Some("Khreshchatyk 1".to_string());
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_nested_user_errors_surface() {
        let mut u = user();
        u.email = "not-an-email".to_string();
        u.phone = Some("123".to_string());
        let req = CreateTutorRequest {
            user: u,
            details: details(),
        };
        let messages = collect_messages(&req.validate().unwrap_err());
        assert!(messages.contains(&"Invalid email address".to_string()));
        assert!(messages.contains(&"Invalid phone number format".to_string()));
    }

    #[test]
    fn test_flattened_json_shape() {
        let json = r#"{
            "user": {"first_name": "Ivan", "last_name": "Petrenko", "email": "ivan@example.com",
                     "phone": "", "user_type": "Student"},
            "city_id": 2,
            "school_grade": 9
        }"#;
        let req: CreateStudentRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.user.user_type, UserType::Student);
        assert!(req.user.phone.is_none());
        assert_eq!(req.details.school_grade, Some(9));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_school_grade_range() {
        let d = StudentDetails {
            city_id: None,
            school_grade: Some(12),
        };
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_search_price_range() {
        let criteria = TutorSearchCriteria {
            min_price: Some(HourlyRate::from_cents(50_000)),
            max_price: Some(HourlyRate::from_cents(20_000)),
            ..Default::default()
        };
        assert!(criteria.validate().is_err());
    }

    #[test]
    fn test_tutor_supports_format() {
        let tutor = Tutor {
            id: TutorId(1),
            city_id: None,
            years_experience: 3,
            education: "BA".to_string(),
            about_me: None,
            online_available: true,
            offline_available: false,
            address: None,
            user: User {
                id: UserId(1),
                first_name: "A".to_string(),
                last_name: "B".to_string(),
                email: "a@b.com".to_string(),
                phone: None,
                user_type: UserType::Tutor,
                date_of_birth: None,
                registration_date: Utc::now(),
            },
        };
        assert!(tutor.supports(BookingFormat::Online));
        assert!(!tutor.supports(BookingFormat::Offline));
        assert_eq!(tutor.user.full_name(), "A B");
    }
}
