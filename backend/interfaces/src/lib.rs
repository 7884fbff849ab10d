//! Trait seams between the core client and its collaborators.

pub mod connector_types;
pub mod reporting;

pub use connector_types::Dispatch;
pub use reporting::{ClientScheduleRecord, ReportingError, ReportingProvider, TransactionRecord};
