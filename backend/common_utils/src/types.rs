//! Amount types.
//!
//! The core works in [`MinorUnit`] (integer cents); callers supply a
//! [`FloatMajorUnit`] decimal amount which is converted exactly once per
//! request.

use std::fmt::Display;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::errors::ParsingError;

/// An amount in the currency's minor unit (cents for every currency the
/// gateway accepts).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct MinorUnit(i64);

impl MinorUnit {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn zero() -> Self {
        Self(0)
    }

    pub fn get_amount_as_i64(self) -> i64 {
        self.0
    }
}

impl Display for MinorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for MinorUnit {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for MinorUnit {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

/// A decimal amount in the currency's major unit, as supplied by callers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatMajorUnit(f64);

impl FloatMajorUnit {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn get_amount_as_f64(self) -> f64 {
        self.0
    }

    /// Convert to minor units by rounding `amount * 100` half away from zero
    /// (`f64::round` semantics). Deterministic: the same input always yields
    /// the same cents value.
    pub fn to_minor_unit(self) -> Result<MinorUnit, ParsingError> {
        if !self.0.is_finite() {
            return Err(ParsingError);
        }
        let cents = (self.0 * 100.0).round();
        if cents > i64::MAX as f64 || cents < i64::MIN as f64 {
            return Err(ParsingError);
        }
        Ok(MinorUnit(cents as i64))
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0.0
    }
}

impl Display for FloatMajorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_major_to_cents() {
        assert_eq!(
            FloatMajorUnit::new(4.12).to_minor_unit().unwrap(),
            MinorUnit::new(412)
        );
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(
            FloatMajorUnit::new(0.005).to_minor_unit().unwrap(),
            MinorUnit::new(1)
        );
        assert_eq!(
            FloatMajorUnit::new(-0.005).to_minor_unit().unwrap(),
            MinorUnit::new(-1)
        );
        assert_eq!(
            FloatMajorUnit::new(2.675).to_minor_unit().unwrap(),
            MinorUnit::new(267)
        );
    }

    #[test]
    fn conversion_is_deterministic() {
        let amount = FloatMajorUnit::new(19.99);
        assert_eq!(
            amount.to_minor_unit().unwrap(),
            amount.to_minor_unit().unwrap()
        );
    }

    #[test]
    fn rejects_non_finite_amounts() {
        assert!(FloatMajorUnit::new(f64::NAN).to_minor_unit().is_err());
        assert!(FloatMajorUnit::new(f64::INFINITY).to_minor_unit().is_err());
    }
}
