use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::id::CityId;
use crate::validation::{PLACE_NAME, blank_as_none};

/// Country assumed when a city is created without one.
pub const DEFAULT_COUNTRY: &str = "Україна";

/// A city where students live and offline tutors teach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
    pub region: Option<String>,
    pub country: String,
}

/// Body for creating or replacing a city.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CityRequest {
    #[validate(
        length(min = 1, max = 100, message = "City name must be between 1 and 100 characters"),
        regex(path = *PLACE_NAME, message = "City name can only contain letters, spaces, apostrophes and hyphens")
    )]
    pub name: String,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        length(max = 100, message = "Region cannot be longer than 100 characters"),
        regex(path = *PLACE_NAME, message = "Region can only contain letters, spaces, apostrophes and hyphens")
    )]
    pub region: Option<String>,

    #[serde(default = "default_country")]
    #[validate(
        length(min = 1, max = 100, message = "Country must be between 1 and 100 characters"),
        regex(path = *PLACE_NAME, message = "Country can only contain letters, spaces, apostrophes and hyphens")
    )]
    pub country: String,
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_defaults_when_missing() {
        let req: CityRequest = serde_json::from_str(r#"{"name":"Lviv"}"#).unwrap();
        assert_eq!(req.country, DEFAULT_COUNTRY);
        assert!(req.region.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_blank_region_is_none() {
        let req: CityRequest =
            serde_json::from_str(r#"{"name":"Lviv","region":"  ","country":"Ukraine"}"#).unwrap();
        assert!(req.region.is_none());
    }

    #[test]
    fn test_name_with_digits_rejected() {
        let req = CityRequest {
            name: "Kyiv2".to_string(),
            region: None,
            country: "Ukraine".to_string(),
        };
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("name"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let req = CityRequest {
            name: String::new(),
            region: Some("Kyivska".to_string()),
            country: "Ukraine".to_string(),
        };
        assert!(req.validate().is_err());
    }
}
