//! Common utilities for the SecurePay client.

pub mod consts;
pub mod errors;
pub mod ext_traits;
pub mod id_type;
pub mod types;

pub use errors::{CustomResult, ParsingError, ValidationError};
pub use id_type::OrderId;
pub use types::{FloatMajorUnit, MinorUnit};

// Minimal in-tree masking types. The upstream masking crate is pulled in as a
// git dependency elsewhere in the ecosystem; the handful of pieces needed here
// live in-tree instead.
pub mod masking {
    use std::fmt;

    use serde::Deserialize;

    /// A wrapper that keeps its inner value out of `Debug` output.
    ///
    /// The inner value is only reachable through [`PeekInterface`] or
    /// [`ExposeInterface`], which keeps accidental logging greppable.
    #[derive(Clone, Deserialize, PartialEq, Eq)]
    #[serde(transparent)]
    pub struct Secret<T>(T);

    impl<T> Secret<T> {
        pub fn new(value: T) -> Self {
            Self(value)
        }
    }

    impl<T> From<T> for Secret<T> {
        fn from(value: T) -> Self {
            Self(value)
        }
    }

    impl<T> fmt::Debug for Secret<T> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("*** masked ***")
        }
    }

    /// Borrow the secret value.
    pub trait PeekInterface<T> {
        fn peek(&self) -> &T;
    }

    impl<T> PeekInterface<T> for Secret<T> {
        fn peek(&self) -> &T {
            &self.0
        }
    }

    /// Consume the wrapper and take the secret value.
    pub trait ExposeInterface<T> {
        fn expose(self) -> T;
    }

    impl<T> ExposeInterface<T> for Secret<T> {
        fn expose(self) -> T {
            self.0
        }
    }
}

pub use masking::{ExposeInterface, PeekInterface, Secret};

/// Generate a random lowercase-hex identifier of `length` characters.
///
/// Used for gateway message ids: unique enough for vendor-side tracing, not
/// required to be unguessable.
pub fn generate_hex_id(length: usize) -> String {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from_digit(rng.gen_range(0..16), 16).unwrap_or('0'))
        .collect()
}

pub mod date_time {
    //! Date formatting for the gateway wire format.

    use time::{macros::format_description, OffsetDateTime, PrimitiveDateTime};

    use crate::errors::ParsingError;

    /// Current date and time in UTC.
    pub fn now() -> PrimitiveDateTime {
        let utc = OffsetDateTime::now_utc();
        PrimitiveDateTime::new(utc.date(), utc.time())
    }

    /// Format a date as `YYYYMMDD`.
    pub fn format_yyyymmdd(date: PrimitiveDateTime) -> Result<String, ParsingError> {
        date.format(&format_description!("[year][month][day]"))
            .map_err(|_| ParsingError)
    }

    /// Format a timestamp in the gateway's message-timestamp layout:
    /// year, then day-of-month *before* month, then time, a literal
    /// millisecond block and a `+000` offset. The day/month ordering is a
    /// quirk of the vendor format and is load-bearing.
    pub fn format_message_timestamp(date: PrimitiveDateTime) -> Result<String, ParsingError> {
        let formatted = date
            .format(&format_description!(
                "[year][day][month][hour][minute][second]"
            ))
            .map_err(|_| ParsingError)?;
        Ok(format!("{formatted}000+000"))
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn hex_id_has_requested_length_and_charset() {
        let id = generate_hex_id(30);
        assert_eq!(id.len(), 30);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn hex_ids_are_not_repeated() {
        assert_ne!(generate_hex_id(30), generate_hex_id(30));
    }

    #[test]
    fn message_timestamp_puts_day_before_month() {
        let ts = date_time::format_message_timestamp(datetime!(2026-08-07 13:45:09)).unwrap();
        assert_eq!(ts, "20260708134509000+000");
    }

    #[test]
    fn yyyymmdd_is_zero_padded() {
        let date = date_time::format_yyyymmdd(datetime!(2026-01-02 00:00:00)).unwrap();
        assert_eq!(date, "20260102");
    }

    #[test]
    fn secret_debug_is_masked() {
        let secret = Secret::new("hunter2".to_string());
        assert_eq!(format!("{secret:?}"), "*** masked ***");
        assert_eq!(secret.peek(), "hunter2");
    }
}
