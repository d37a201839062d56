use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::id::{LevelId, SubjectId, TutorId, TutorSubjectId};
use crate::money::HourlyRate;
use crate::validation::positive_rate;

/// A tutor's offer to teach one subject at one level for an hourly rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorSubject {
    pub id: TutorSubjectId,
    pub tutor_id: TutorId,
    pub subject_id: SubjectId,
    pub level_id: LevelId,
    pub hourly_rate: HourlyRate,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTutorSubjectRequest {
    #[validate(range(min = 1, message = "TutorId must be greater than 0"))]
    pub tutor_id: i64,

    #[validate(range(min = 1, message = "SubjectId must be greater than 0"))]
    pub subject_id: i64,

    #[validate(range(min = 1, message = "LevelId must be greater than 0"))]
    pub level_id: i64,

    #[validate(custom(function = "positive_rate"))]
    pub hourly_rate: HourlyRate,
}

/// Only the rate of an existing offer can change.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateTutorSubjectRequest {
    #[validate(custom(function = "positive_rate"))]
    pub hourly_rate: HourlyRate,
}

/// Rate spread across all of one tutor's offers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TutorPricing {
    pub tutor_id: TutorId,
    pub tutor_name: String,
    pub min_rate: HourlyRate,
    pub max_rate: HourlyRate,
    /// Mean rate rounded to whole cents.
    pub avg_rate: HourlyRate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_must_be_positive() {
        let req = UpdateTutorSubjectRequest {
            hourly_rate: HourlyRate::from_cents(0),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_from_json() {
        let req: CreateTutorSubjectRequest = serde_json::from_str(
            r#"{"tutor_id": 1, "subject_id": 2, "level_id": 3, "hourly_rate": 450.5}"#,
        )
        .unwrap();
        assert_eq!(req.hourly_rate.cents(), 45_050);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_ids_must_be_positive() {
        let req = CreateTutorSubjectRequest {
            tutor_id: 0,
            subject_id: 1,
            level_id: 1,
            hourly_rate: HourlyRate::from_cents(100),
        };
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("tutor_id"));
    }
}
