//! Reporting-provider seam.
//!
//! The vendor exposes transaction listings and periodic-schedule exports only
//! through its HTML merchant portal. Scraping that portal is glue against an
//! unversioned UI, so it lives behind this trait with no contract guarantees
//! other than "may change whenever the vendor's pages change". The core
//! client never depends on an implementation, and an implementation's session
//! state (cookies, portal login) must not be shared with the core's per-call
//! credential handling.

use std::collections::BTreeMap;

use common_utils::errors::CustomResult;
use common_utils::types::FloatMajorUnit;
use domain_types::Currency;
use time::OffsetDateTime;

#[derive(Debug, thiserror::Error)]
pub enum ReportingError {
    #[error("Portal sign-in failed")]
    SigninFailed,
    #[error("The portal page did not match the expected layout")]
    UnexpectedPageLayout,
    #[error("Failed to retrieve the report: {0}")]
    RetrievalFailed(String),
}

/// One row of the portal's transaction listing.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub merchant_id: String,
    pub transaction_id: String,
    pub reference: String,
    pub date: OffsetDateTime,
    pub masked_card: String,
    pub amount: FloatMajorUnit,
    pub currency: Currency,
    pub code: String,
    pub result: String,
    pub kind: String,
}

/// One row of the merchant CSV export for periodic schedules. The export's
/// column set is not versioned, so the fields are kept as-is.
#[derive(Debug, Clone)]
pub struct ClientScheduleRecord {
    pub client_id: String,
    pub fields: BTreeMap<String, String>,
}

#[async_trait::async_trait]
pub trait ReportingProvider: Send + Sync {
    /// Transactions between the two instants, both inclusive.
    async fn transactions(
        &self,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> CustomResult<Vec<TransactionRecord>, ReportingError>;

    /// The periodic-schedule record for one client id.
    async fn client_schedule(
        &self,
        client_id: &str,
    ) -> CustomResult<Option<ClientScheduleRecord>, ReportingError>;
}
