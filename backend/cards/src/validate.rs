use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use common_utils::{
    errors::ValidationError,
    masking::{PeekInterface, Secret},
};
use regex::Regex;
use serde::Deserialize;
use time::OffsetDateTime;

/// How many years past the current one an expiry year is still accepted.
const EXPIRY_WINDOW_YEARS: u16 = 30;

#[allow(clippy::expect_used)]
fn card_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9]{12,16}").expect("card number regex is valid"))
}

#[allow(clippy::expect_used)]
fn expiry_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"([0-9]{1,2})/([0-9]{2,4})").expect("expiry date regex is valid")
    })
}

#[allow(clippy::expect_used)]
fn cvv_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9]{3,4}").expect("cvv regex is valid"))
}

/// A credit card number.
///
/// Shape check: the value must contain a run of 12 to 16 digits *anywhere* in
/// the string (not anchored). Callers must not rely on this for card-number
/// extraction, only for presence of a plausible number.
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct CardNumber(Secret<String>);

impl CardNumber {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Secret::new(value.into()))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if card_number_pattern().is_match(self.0.peek()) {
            Ok(())
        } else {
            Err(ValidationError::invalid("Invalid Credit Card Number"))
        }
    }

    /// The raw value, for request composition only.
    pub fn peek(&self) -> &str {
        self.0.peek()
    }
}

impl fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CardNumber(*** masked ***)")
    }
}

impl FromStr for CardNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = Self::new(s);
        number.validate()?;
        Ok(number)
    }
}

/// A card expiry date, normalized to zero-padded `MM/YY` form.
///
/// Accepts `M/YY`, `MM/YY`, `M/YYYY` and `MM/YYYY`; four-digit years are
/// truncated to their last two digits. Normalization happens at parse time,
/// independent of whether the month/window check later passes: a shape-valid
/// `13/29` parses and renders as `13/29`, then fails [`Self::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryDate {
    month: u8,
    year: u16,
}

impl ExpiryDate {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let captures = expiry_pattern()
            .captures(value)
            .ok_or_else(|| ValidationError::invalid("Invalid Expiry Date"))?;
        let month_str = &captures[1];
        let year_str = &captures[2];
        let year_str = if year_str.len() == 4 {
            &year_str[2..]
        } else {
            year_str
        };
        let month = month_str
            .parse::<u8>()
            .map_err(|_| ValidationError::invalid("Invalid Expiry Date"))?;
        let year = year_str
            .parse::<u16>()
            .map_err(|_| ValidationError::invalid("Invalid Expiry Date"))?;
        Ok(Self { month, year })
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    /// Check month range and the rolling expiry window against `now`.
    ///
    /// Valid iff month is 1..=12 and the two-digit year falls within
    /// `[current year, current year + 30)`. The window moves with the clock,
    /// so this must be evaluated at validation time, not cached.
    pub fn validate_at(&self, now: OffsetDateTime) -> Result<(), ValidationError> {
        let current_yy = (now.year().rem_euclid(100)) as u16;
        let in_window = self.year >= current_yy && self.year < current_yy + EXPIRY_WINDOW_YEARS;
        if (1..=12).contains(&self.month) && in_window {
            Ok(())
        } else {
            Err(ValidationError::invalid("Invalid Expiry Date"))
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_at(OffsetDateTime::now_utc())
    }
}

impl fmt::Display for ExpiryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.year < 100 {
            write!(f, "{:02}/{:02}", self.month, self.year)
        } else {
            write!(f, "{:02}/{}", self.month, self.year)
        }
    }
}

impl FromStr for ExpiryDate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A card verification value. Optional at the request level; when present it
/// must contain a run of 3 or 4 digits (non-anchored, same leniency caveat as
/// [`CardNumber`]).
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Cvv(Secret<String>);

impl Cvv {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Secret::new(value.into()))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if cvv_pattern().is_match(self.0.peek()) {
            Ok(())
        } else {
            Err(ValidationError::invalid("Invalid CVV code"))
        }
    }

    /// The value left-padded with zeros to three digits, as sent on the wire
    /// alongside full card details.
    pub fn padded(&self) -> String {
        format!("{:0>3}", self.0.peek())
    }
}

impl fmt::Debug for Cvv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Cvv(*** masked ***)")
    }
}
