pub mod transformers;


use domain_types::types::SecurepayParams;

pub mod constants {
    //! Wire-level constants from the SecureXML interface.

    /// API version for echo, payment and refund documents.
    pub const API_VERSION_PAYMENT: &str = "xml-4.2";
    /// API version for periodic documents.
    pub const API_VERSION_PERIODIC: &str = "spxml-3.0";
    /// Advisory gateway-side timeout carried in the envelope, in seconds.
    pub const TIMEOUT_VALUE: u32 = 60;
    /// The gateway demands this txnSource value for API traffic.
    pub const TXN_SOURCE: u8 = 23;

    pub const TXN_TYPE_PAYMENT: u8 = 0;
    pub const TXN_TYPE_REFUND: u8 = 4;
    pub const TXN_TYPE_PREAUTH: u8 = 10;
    pub const TXN_TYPE_COMPLETE_PREAUTH: u8 = 11;

    pub const ACTION_ADD: &str = "add";
    pub const ACTION_TRIGGER: &str = "trigger";

    /// periodicType for day-interval schedules.
    pub const PERIODIC_TYPE_DAY_BASED: u8 = 2;
    /// periodicType for calendar-based schedules (weekly through yearly).
    pub const PERIODIC_TYPE_CALENDAR: u8 = 3;
    /// The gateway requires a finite payment count; this caps "unbounded".
    pub const UNBOUNDED_PAYMENT_CAP: u32 = 999;

    pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";
}

/// The SecurePay SecureXML connector.
#[derive(Debug, Clone, Copy, Default)]
pub struct Securepay;

impl Securepay {
    pub fn id() -> &'static str {
        "securepay"
    }

    pub fn content_type() -> &'static str {
        "text/xml"
    }

    /// The URL a document of this kind goes to. Pure over
    /// {endpoint family} x {test mode}.
    pub fn endpoint<'a>(params: &'a SecurepayParams, kind: DocumentKind, test: bool) -> &'a str {
        params.endpoint(kind.is_periodic_family(), test)
    }
}

/// The five document shapes the composer can produce. Selection is a pure
/// function of the four request flags, see [`document_kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Echo,
    /// Once-off payment; `txn_type` is 0 (standard), 10 (reserve pre-auth)
    /// or 11 (complete pre-auth).
    Payment { txn_type: u8 },
    PeriodicSetup,
    Trigger,
    Refund,
}

impl DocumentKind {
    /// Periodic documents go to the periodic endpoint family; everything
    /// else (echo, payment, refund) to the payment family.
    pub fn is_periodic_family(self) -> bool {
        matches!(self, Self::PeriodicSetup | Self::Trigger)
    }

    pub fn api_version(self) -> &'static str {
        if self.is_periodic_family() {
            constants::API_VERSION_PERIODIC
        } else {
            constants::API_VERSION_PAYMENT
        }
    }
}

/// Select the document shape for a charge-path call.
///
/// Refund wins over everything, a repeat schedule wins over pre-auth state,
/// and the pre-auth flag picks between reserve (10) and complete (11) based
/// on whether a reservation id is already held. Without the pre-auth flag
/// the transaction type stays 0 even when a stale reservation id is present.
pub fn document_kind(
    is_refund: bool,
    is_periodic: bool,
    preauth: bool,
    has_preauth_id: bool,
) -> DocumentKind {
    if is_refund {
        DocumentKind::Refund
    } else if is_periodic {
        DocumentKind::PeriodicSetup
    } else {
        let txn_type = if preauth {
            if has_preauth_id {
                constants::TXN_TYPE_COMPLETE_PREAUTH
            } else {
                constants::TXN_TYPE_PREAUTH
            }
        } else {
            constants::TXN_TYPE_PAYMENT
        };
        DocumentKind::Payment { txn_type }
    }
}
