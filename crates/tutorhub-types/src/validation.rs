//! Shared validation rules used by the request DTOs.
//!
//! Field rules are declared with `#[derive(Validate)]` on each request type;
//! this module holds the patterns and cross-field checks those derives call.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::money::{HourlyRate, MAX_RATE_CENTS};

/// Personal names: Ukrainian or Latin letters, apostrophe and hyphen.
pub static PERSON_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[А-ЯІЇЄҐа-яіїєґA-Za-z'-]+$").expect("person name regex")
});

/// Place names additionally allow inner whitespace ("Ivano-Frankivsk", "Kryvyi Rih").
pub static PLACE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[А-ЯІЇЄҐа-яіїєґA-Za-z\s'-]+$").expect("place name regex")
});

pub static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{10,19}$").expect("phone regex"));

/// Build a validation error carrying a human-readable message.
pub fn rule(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

pub fn contains_letter(value: &str) -> Result<(), ValidationError> {
    if value.chars().any(char::is_alphabetic) {
        Ok(())
    } else {
        Err(rule(
            "letter_required",
            "Teaching level name must contain at least one letter",
        ))
    }
}

pub fn positive_rate(rate: &HourlyRate) -> Result<(), ValidationError> {
    if rate.cents() <= 0 {
        return Err(rule("rate_positive", "Hourly rate must be greater than 0"));
    }
    if rate.cents() > MAX_RATE_CENTS {
        return Err(rule("rate_max", "Hourly rate cannot exceed 999999.99"));
    }
    Ok(())
}

/// Serde helper: `""` and whitespace-only strings deserialize as `None`.
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Flatten nested validation errors into sorted, de-duplicated messages.
pub fn collect_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();
    collect_into(errors, &mut messages);
    messages.sort();
    messages.dedup();
    messages
}

fn collect_into(errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    match &err.message {
                        Some(message) => out.push(message.to_string()),
                        None => out.push(format!("{field}: {}", err.code)),
                    }
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_into(nested, out),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_into(nested, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_name_pattern() {
        assert!(PERSON_NAME.is_match("Олена"));
        assert!(PERSON_NAME.is_match("O'Neil"));
        assert!(PERSON_NAME.is_match("Anne-Marie"));
        assert!(!PERSON_NAME.is_match("John1"));
        assert!(!PERSON_NAME.is_match("Mary Jane"));
    }

    #[test]
    fn test_place_name_allows_spaces() {
        assert!(PLACE_NAME.is_match("Кривий Ріг"));
        assert!(!PLACE_NAME.is_match("Kyiv-2"));
    }

    #[test]
    fn test_phone_pattern() {
        assert!(PHONE.is_match("+380501234567"));
        assert!(PHONE.is_match("0501234567"));
        assert!(!PHONE.is_match("12345"));
        assert!(!PHONE.is_match("+38 050 123 45 67"));
    }

    #[test]
    fn test_contains_letter() {
        assert!(contains_letter("Grade 5").is_ok());
        assert!(contains_letter("123").is_err());
    }

    #[test]
    fn test_positive_rate() {
        assert!(positive_rate(&HourlyRate::from_cents(1)).is_ok());
        assert!(positive_rate(&HourlyRate::from_cents(0)).is_err());
    }
}
