//! Hourly rates as exact minor units.
//!
//! Rates travel over JSON as decimal numbers (`350.5`) but are held and
//! stored as integer cents so comparisons and aggregates never drift.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use std::fmt;

/// Largest representable rate: precision 8, scale 2.
pub const MAX_RATE_CENTS: i64 = 99_999_999;

/// An hourly rate in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HourlyRate(i64);

impl HourlyRate {
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    /// Convert a decimal amount, rejecting more than two fractional digits.
    pub fn from_decimal(amount: f64) -> Result<Self, String> {
        if !amount.is_finite() {
            return Err("rate must be a finite number".to_string());
        }
        let scaled = amount * 100.0;
        let cents = scaled.round();
        if (scaled - cents).abs() > 1e-6 {
            return Err(format!(
                "rate {amount} has more than two decimal places"
            ));
        }
        if cents.abs() > MAX_RATE_CENTS as f64 {
            return Err(format!("rate {amount} exceeds 999999.99"));
        }
        Ok(Self(cents as i64))
    }

    pub fn as_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for HourlyRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Serialize for HourlyRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for HourlyRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        HourlyRate::from_decimal(amount).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_decimal_exact_cents() {
        assert_eq!(HourlyRate::from_decimal(350.5).unwrap().cents(), 35_050);
        assert_eq!(HourlyRate::from_decimal(0.01).unwrap().cents(), 1);
        assert_eq!(HourlyRate::from_decimal(19.99).unwrap().cents(), 1_999);
    }

    #[test]
    fn test_from_decimal_rejects_third_decimal() {
        assert!(HourlyRate::from_decimal(10.005).is_err());
    }

    #[test]
    fn test_from_decimal_rejects_overflow() {
        assert!(HourlyRate::from_decimal(1_000_000.0).is_err());
        assert!(HourlyRate::from_decimal(999_999.99).is_ok());
    }

    #[test]
    fn test_display_pads_cents() {
        assert_eq!(HourlyRate::from_cents(35_005).to_string(), "350.05");
        assert_eq!(HourlyRate::from_cents(7).to_string(), "0.07");
    }

    #[test]
    fn test_json_shape() {
        let rate: HourlyRate = serde_json::from_str("420.25").unwrap();
        assert_eq!(rate.cents(), 42_025);
        assert_eq!(serde_json::to_string(&rate).unwrap(), "420.25");
        assert!(serde_json::from_str::<HourlyRate>("1.234").is_err());
    }
}
