use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::id::{BookingId, ReviewId};
use crate::validation::blank_as_none;

/// A student's rating of a completed, past session. One per booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub booking_id: BookingId,
    pub rating: i16,
    pub comment: Option<String>,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
}

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(range(min = 1, message = "BookingId must be greater than 0"))]
    pub booking_id: i64,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(
        min = 10,
        max = 1500,
        message = "Comment must be between 10 and 1500 characters"
    ))]
    pub comment: Option<String>,

    #[serde(default)]
    pub is_anonymous: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(
        min = 10,
        max = 1500,
        message = "Comment must be between 10 and 1500 characters"
    ))]
    pub comment: Option<String>,

    #[serde(default)]
    pub is_anonymous: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        for rating in [0, 6] {
            let req = UpdateReviewRequest {
                rating,
                comment: None,
                is_anonymous: false,
            };
            assert!(req.validate().is_err(), "rating {rating} should be rejected");
        }
        let req = UpdateReviewRequest {
            rating: 5,
            comment: None,
            is_anonymous: false,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_short_comment_rejected_but_empty_allowed() {
        let req: CreateReviewRequest =
            serde_json::from_str(r#"{"booking_id": 1, "rating": 4, "comment": "ok"}"#).unwrap();
        assert!(req.validate().is_err());

        let req: CreateReviewRequest =
            serde_json::from_str(r#"{"booking_id": 1, "rating": 4, "comment": ""}"#).unwrap();
        assert!(req.comment.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_long_comment_rejected() {
        let req = CreateReviewRequest {
            booking_id: 1,
            rating: 3,
            comment: Some("a".repeat(1501)),
            is_anonymous: true,
        };
        assert!(req.validate().is_err());
    }
}
