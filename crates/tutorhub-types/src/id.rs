//! Integer identifiers for every persisted entity.
//!
//! Each entity gets its own newtype so a `ScheduleId` can never be passed
//! where a `BookingId` is expected. Ids are assigned by the database and
//! serialize as bare JSON numbers.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

entity_id!(
    /// Identifier of a city.
    CityId
);
entity_id!(
    /// Identifier of a user account (shared by students and tutors).
    UserId
);
entity_id!(
    /// Identifier of a student. Equal to the student's user id.
    StudentId
);
entity_id!(
    /// Identifier of a tutor. Equal to the tutor's user id.
    TutorId
);
entity_id!(SubjectId);
entity_id!(LevelId);
entity_id!(TutorSubjectId);
entity_id!(ScheduleId);
entity_id!(BookingId);
entity_id!(ReviewId);

impl From<StudentId> for UserId {
    fn from(id: StudentId) -> Self {
        UserId(id.0)
    }
}

impl From<TutorId> for UserId {
    fn from(id: TutorId) -> Self {
        UserId(id.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_parse() {
        let id: BookingId = "42".parse().unwrap();
        assert_eq!(id, BookingId(42));
        assert_eq!(id.to_string(), "42");
        assert!("abc".parse::<BookingId>().is_err());
    }

    #[test]
    fn test_id_serializes_as_number() {
        let json = serde_json::to_string(&ScheduleId(7)).unwrap();
        assert_eq!(json, "7");
        let back: ScheduleId = serde_json::from_str("7").unwrap();
        assert_eq!(back, ScheduleId(7));
    }

    #[test]
    fn test_profile_ids_map_to_user_ids() {
        assert_eq!(UserId::from(TutorId(3)), UserId(3));
        assert_eq!(UserId::from(StudentId(5)), UserId(5));
    }
}
