//! Card primitives for the SecurePay client.
//!
//! The checks here are deliberately lenient: the gateway does its own strict
//! validation, so these only reject values that cannot possibly be accepted.

pub mod validate;

pub use validate::{CardNumber, Cvv, ExpiryDate};
