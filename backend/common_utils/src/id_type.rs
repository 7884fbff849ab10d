//! Common ID types.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_ORDER_ID_LENGTH, MIN_ORDER_ID_LENGTH};

/// A purchase-order / client id, unique per the caller's bookkeeping.
///
/// The gateway accepts between 1 and 60 characters; the bound is enforced at
/// construction so an in-range value is guaranteed everywhere downstream.
#[derive(Debug, Clone, Serialize, Hash, PartialEq, Eq)]
pub struct OrderId(String);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("order id length must be between 1 and 60 characters, got {0}")]
pub struct OrderIdError(usize);

impl OrderId {
    pub fn new(value: impl Into<String>) -> Result<Self, OrderIdError> {
        let value = value.into();
        let length = value.chars().count();
        if (MIN_ORDER_ID_LENGTH..=MAX_ORDER_ID_LENGTH).contains(&length) {
            Ok(Self(value))
        } else {
            Err(OrderIdError(length))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for OrderId {
    type Error = OrderIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::str::FromStr for OrderId {
    type Err = OrderIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for OrderId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
