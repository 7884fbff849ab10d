//! High-level client for the SecurePay SecureXML payment gateway.
//!
//! Wraps document composition, dispatch and response interpretation behind a
//! handful of operations: [`SecurepayClient::echo`],
//! [`SecurepayClient::charge`], [`SecurepayClient::trigger`] and
//! [`SecurepayClient::refund`]. Each call owns its request and result; the
//! only state shared between calls is the read-only merchant credentials.

pub mod client;
pub mod configs;
pub mod logger;

pub use client::{SecurepayClient, SecurepayError};
pub use configs::Config;

// The domain surface callers need to build requests and branch on results.
pub use cards::{CardNumber, Cvv, ExpiryDate};
pub use common_utils::{masking::Secret, types::FloatMajorUnit, OrderId};
pub use domain_types::{
    CardDetails, ChargeOutcome, Currency, MerchantAuth, PaymentRequest, RefundOutcome,
    RefundRequest, RepeatPeriod, RepeatSchedule, SecurepayStatus, StatusResult, TriggerRequest,
};
