//! Connector implementations.
//!
//! One connector lives here today: the SecurePay SecureXML gateway.

pub mod connectors;

pub use connectors::securepay::{self, Securepay};
