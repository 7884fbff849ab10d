use common_utils::{
    errors::ValidationError,
    masking::Secret,
    types::{FloatMajorUnit, MinorUnit},
    OrderId,
};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::payment_method_data::CardDetails;

/// Merchant credentials, read-only once constructed.
#[derive(Debug, Clone)]
pub struct MerchantAuth {
    pub merchant_id: String,
    pub password: Secret<String>,
    pub test_password: Option<Secret<String>>,
}

impl MerchantAuth {
    pub fn new(merchant_id: impl Into<String>, password: Secret<String>) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            password,
            test_password: None,
        }
    }

    pub fn with_test_password(mut self, test_password: Secret<String>) -> Self {
        self.test_password = Some(test_password);
        self
    }

    /// The password to put on the wire: the test password when test mode is
    /// active and one is configured, otherwise the live password. The
    /// fallback to the live password in test mode is deliberate.
    pub fn password_for_mode(&self, test_mode: bool) -> &Secret<String> {
        if test_mode {
            self.test_password.as_ref().unwrap_or(&self.password)
        } else {
            &self.password
        }
    }
}

/// The closed set of currencies the gateway accepts. Codes are matched
/// exactly and case-sensitively.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum Currency {
    #[default]
    USD,
    AUD,
    CAD,
    CHF,
    DEM,
    EUR,
    FRF,
    GBP,
    GRD,
    HKD,
    ITL,
    JPY,
    NZD,
    SGD,
}

/// Cadence of a periodic schedule.
///
/// The discriminants are the gateway's payment-interval codes for
/// calendar-based schedules; daily schedules use an explicit day count
/// instead.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RepeatPeriod {
    Daily = 0,
    Weekly = 1,
    Fortnightly = 2,
    Monthly = 3,
    Quarterly = 4,
    HalfYearly = 5,
    Yearly = 6,
}

impl RepeatPeriod {
    /// The gateway's interval code for this period.
    pub fn interval_code(self) -> u8 {
        self as u8
    }
}

/// A recurring-charge schedule. Present on a request iff the transaction is
/// periodic; periodic requests route to a different endpoint family and
/// document shape than once-off ones.
#[derive(Debug, Clone)]
pub struct RepeatSchedule {
    pub period: RepeatPeriod,
    /// Days between charges; only consulted when `period` is daily.
    pub interval_days: Option<u32>,
    /// When the schedule starts; "now" if unset.
    pub start: Option<PrimitiveDateTime>,
    /// Number of charges; 0 means unbounded, which the gateway caps at 999.
    pub count: u32,
    /// Issue the first trigger call immediately after a successful setup.
    pub auto_trigger: bool,
}

impl RepeatSchedule {
    pub fn new(period: RepeatPeriod) -> Self {
        Self {
            period,
            interval_days: None,
            start: None,
            count: 0,
            auto_trigger: true,
        }
    }

    pub fn with_interval_days(mut self, days: u32) -> Self {
        self.interval_days = Some(days);
        self
    }

    pub fn with_start(mut self, start: PrimitiveDateTime) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_auto_trigger(mut self, auto_trigger: bool) -> Self {
        self.auto_trigger = auto_trigger;
        self
    }
}

/// One payment call: immutable once built, owned by the call that creates it.
/// No state is shared across calls except the read-only credentials.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub test_mode: bool,
    pub card: Option<CardDetails>,
    pub amount: FloatMajorUnit,
    pub currency: Currency,
    pub order_id: OrderId,
    /// Reserve funds instead of charging.
    pub preauth: bool,
    /// Set once a pre-auth reservation has succeeded; its presence switches a
    /// pre-auth request from "reserve" to "complete" and drops card details
    /// from the document.
    pub preauth_id: Option<String>,
    pub repeat: Option<RepeatSchedule>,
    /// Demand a cvv even though the field is normally optional.
    pub require_cvv: bool,
}

impl PaymentRequest {
    pub fn new(amount: FloatMajorUnit, currency: Currency, order_id: OrderId) -> Self {
        Self {
            test_mode: false,
            card: None,
            amount,
            currency,
            order_id,
            preauth: false,
            preauth_id: None,
            repeat: None,
            require_cvv: false,
        }
    }

    pub fn with_card(mut self, card: CardDetails) -> Self {
        self.card = Some(card);
        self
    }

    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    pub fn with_preauth(mut self) -> Self {
        self.preauth = true;
        self
    }

    pub fn with_preauth_id(mut self, preauth_id: impl Into<String>) -> Self {
        self.preauth_id = Some(preauth_id.into());
        self
    }

    pub fn with_repeat(mut self, repeat: RepeatSchedule) -> Self {
        self.repeat = Some(repeat);
        self
    }

    pub fn with_require_cvv(mut self) -> Self {
        self.require_cvv = true;
        self
    }

    pub fn is_periodic(&self) -> bool {
        self.repeat.is_some()
    }

    /// Run every check in the fixed order card → expiry → cvv → amount →
    /// currency → order id, stopping at the first failure. The surfaced
    /// message is therefore the last check that executed. Currency and order
    /// id are already guaranteed by their types; they hold their place in the
    /// order for completeness.
    pub fn validate_at(&self, now: OffsetDateTime) -> Result<(), ValidationError> {
        match &self.card {
            Some(card) => card.validate_at(now, self.require_cvv)?,
            // Card details are only optional when a pre-auth reservation is
            // being completed.
            None if self.preauth_id.is_none() => {
                return Err(ValidationError::invalid("Invalid Credit Card Number"))
            }
            None => {}
        }
        if !self.amount.is_positive() {
            return Err(ValidationError::invalid("Invalid charge amount"));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_at(OffsetDateTime::now_utc())
    }
}

/// A refund of a previously approved transaction. The order id must match
/// the original transaction's, and the amount may not exceed the original
/// (the gateway enforces the ceiling; the client only checks positivity).
#[derive(Debug, Clone)]
pub struct RefundRequest {
    pub test_mode: bool,
    /// The gateway transaction id captured when the original charge was
    /// approved.
    pub txn_id: String,
    pub order_id: OrderId,
    pub amount: FloatMajorUnit,
    pub currency: Currency,
    pub preauth_id: Option<String>,
}

impl RefundRequest {
    pub fn new(
        txn_id: impl Into<String>,
        order_id: OrderId,
        amount: FloatMajorUnit,
        currency: Currency,
    ) -> Self {
        Self {
            test_mode: false,
            txn_id: txn_id.into(),
            order_id,
            amount,
            currency,
            preauth_id: None,
        }
    }

    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.txn_id.is_empty() {
            return Err(ValidationError::MissingRequiredField {
                field_name: "txn_id",
            });
        }
        if !self.amount.is_positive() {
            return Err(ValidationError::invalid("Invalid charge amount"));
        }
        Ok(())
    }
}

/// A manual trigger of an existing periodic schedule, identified by the
/// order/client id it was set up with. Carries no card data.
#[derive(Debug, Clone)]
pub struct TriggerRequest {
    pub test_mode: bool,
    pub order_id: OrderId,
    pub amount: FloatMajorUnit,
}

impl TriggerRequest {
    pub fn new(order_id: OrderId, amount: FloatMajorUnit) -> Self {
        Self {
            test_mode: false,
            order_id,
            amount,
        }
    }

    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.amount.is_positive() {
            return Err(ValidationError::invalid("Invalid charge amount"));
        }
        Ok(())
    }
}

/// The stable status vocabulary callers branch on, independent of vendor
/// code drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SecurepayStatus {
    Unknown,
    Ok,
    InvalidUser,
    InvalidPassword,
    InvalidUrl,
    ServerDown,
    Timeout,
    ServerError,
    XmlError,
    ConnectionError,
    Approved,
    Declined,
}

/// Machine-readable status plus the human-readable message for it. Computed
/// fresh on every call and returned to the caller; never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusResult {
    pub status: SecurepayStatus,
    pub message: Option<String>,
}

impl StatusResult {
    pub fn new(status: SecurepayStatus) -> Self {
        Self {
            status,
            message: None,
        }
    }

    pub fn with_message(status: SecurepayStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == SecurepayStatus::Approved
    }
}

/// Transaction-level data from a response, over the two tree shapes the
/// gateway produces. Probing order is standard first, then periodic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionOutcome {
    Standard(TxnResult),
    Periodic(PeriodicResult),
    NoTransaction,
}

/// Result row from the standard single-transaction list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxnResult {
    pub response_code: i64,
    pub response_text: Option<String>,
    pub txn_id: Option<String>,
    pub preauth_id: Option<String>,
}

/// Result row from the periodic item list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodicResult {
    pub response_code: i64,
    pub response_text: Option<String>,
}

/// A parsed gateway response: the server-level code plus whatever
/// transaction-level data was present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub status_code: u32,
    pub status_description: String,
    pub outcome: TransactionOutcome,
}

/// The composite result of a charge call.
///
/// When a periodic setup chains an automatic trigger, both results are kept:
/// `payment` is the setup call, `trigger` the chained call. [`Self::status`]
/// preserves the historical precedence (the trigger result wins when
/// present), while callers that need to tell "setup failed" from "setup
/// succeeded, trigger failed" can inspect both fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeOutcome {
    pub message_id: String,
    pub payment: StatusResult,
    pub trigger: Option<StatusResult>,
    /// Gateway transaction id, captured on approval for later refunds.
    pub txn_id: Option<String>,
    /// Pre-auth id, captured when the call requested a reservation.
    pub preauth_id: Option<String>,
    /// The amount as sent to the gateway, in minor units.
    pub amount: MinorUnit,
}

impl ChargeOutcome {
    /// The overall result of the call chain.
    pub fn status(&self) -> &StatusResult {
        self.trigger.as_ref().unwrap_or(&self.payment)
    }
}

/// The result of a refund call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundOutcome {
    pub message_id: String,
    pub result: StatusResult,
    /// Gateway transaction id of the refund itself, captured on approval.
    pub txn_id: Option<String>,
    /// The refunded amount as sent to the gateway, in minor units.
    pub amount: MinorUnit,
}
