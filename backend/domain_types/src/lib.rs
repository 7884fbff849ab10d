//! Domain types for the SecurePay client: the per-call request model, the
//! stable status vocabulary, parsed gateway responses and endpoint
//! configuration.

pub mod connector_types;
pub mod errors;
pub mod payment_method_data;
pub mod types;

pub use connector_types::{
    ChargeOutcome, Currency, GatewayResponse, MerchantAuth, PaymentRequest, PeriodicResult,
    RefundOutcome, RefundRequest, RepeatPeriod, RepeatSchedule, SecurepayStatus, StatusResult,
    TransactionOutcome, TriggerRequest, TxnResult,
};
pub use payment_method_data::CardDetails;
pub use types::{Connectors, Proxy, SecurepayParams};
