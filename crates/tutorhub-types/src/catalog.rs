//! Subjects and teaching levels: the catalog tutors pick their offers from.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::id::{LevelId, SubjectId};
use crate::validation::{blank_as_none, contains_letter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    /// Free-form grouping such as "STEM" or "Languages".
    pub category: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubjectRequest {
    #[validate(length(min = 1, max = 100, message = "Subject name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 100, message = "Category must be between 1 and 100 characters"))]
    pub category: String,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
}

/// An ordered teaching level ("Primary school", "Exam prep", ...).
///
/// `position` gives the display order and is unique across levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeachingLevel {
    pub id: LevelId,
    pub name: String,
    pub position: i32,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TeachingLevelRequest {
    #[validate(
        length(min = 1, max = 100, message = "Teaching level name must be between 1 and 100 characters"),
        custom(function = "contains_letter")
    )]
    pub name: String,

    #[validate(range(min = 1, message = "Position must be a positive number"))]
    pub position: i32,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_request_valid() {
        let req = SubjectRequest {
            name: "Mathematics".to_string(),
            category: "STEM".to_string(),
            description: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_subject_description_limit() {
        let req = SubjectRequest {
            name: "Physics".to_string(),
            category: "STEM".to_string(),
            description: Some("x".repeat(501)),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_level_name_needs_letter() {
        let req = TeachingLevelRequest {
            name: "1-4".to_string(),
            position: 1,
            description: None,
        };
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("name"));
    }

    #[test]
    fn test_level_position_positive() {
        let req = TeachingLevelRequest {
            name: "Beginner".to_string(),
            position: 0,
            description: None,
        };
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("position"));
    }
}
