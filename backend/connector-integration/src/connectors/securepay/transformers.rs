use common_utils::{
    consts::MESSAGE_ID_LENGTH, date_time, errors::CustomResult, ext_traits::XmlExt,
    generate_hex_id, masking::PeekInterface,
};
use domain_types::{
    errors::ConnectorError, GatewayResponse, MerchantAuth, PaymentRequest, PeriodicResult,
    RefundRequest, RepeatPeriod, SecurepayStatus, StatusResult, TransactionOutcome,
    TriggerRequest, TxnResult,
};
use error_stack::ResultExt;
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use super::{constants, document_kind, DocumentKind};

/// Per-message envelope data: a fresh id and timestamp for every document.
#[derive(Debug, Clone)]
pub struct MessageMeta {
    pub message_id: String,
    pub timestamp: PrimitiveDateTime,
}

impl MessageMeta {
    pub fn generate() -> Self {
        Self {
            message_id: generate_hex_id(MESSAGE_ID_LENGTH),
            timestamp: date_time::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Request documents (quick-xml serialization)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename = "SecurePayMessage")]
pub struct SecurePayMessage {
    #[serde(rename = "MessageInfo")]
    pub message_info: MessageInfo,
    #[serde(rename = "MerchantInfo")]
    pub merchant_info: MerchantInfo,
    #[serde(rename = "RequestType")]
    pub request_type: &'static str,
    #[serde(rename = "Payment", skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentInfo>,
    #[serde(rename = "Periodic", skip_serializing_if = "Option::is_none")]
    pub periodic: Option<PeriodicInfo>,
}

#[derive(Debug, Serialize)]
pub struct MessageInfo {
    #[serde(rename = "messageID")]
    pub message_id: String,
    #[serde(rename = "messageTimestamp")]
    pub message_timestamp: String,
    #[serde(rename = "timeoutValue")]
    pub timeout_value: u32,
    #[serde(rename = "apiVersion")]
    pub api_version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MerchantInfo {
    #[serde(rename = "merchantID")]
    pub merchant_id: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct PaymentInfo {
    #[serde(rename = "TxnList")]
    pub txn_list: TxnList,
}

#[derive(Debug, Serialize)]
pub struct TxnList {
    // The current API only ever accepts a single transaction per message.
    #[serde(rename = "@count")]
    pub count: u32,
    #[serde(rename = "Txn")]
    pub txns: Vec<Txn>,
}

#[derive(Debug, Serialize)]
pub struct Txn {
    #[serde(rename = "@ID")]
    pub id: u32,
    #[serde(rename = "txnType")]
    pub txn_type: u8,
    #[serde(rename = "txnSource")]
    pub txn_source: u8,
    pub amount: i64,
    pub currency: String,
    #[serde(rename = "purchaseOrderNo")]
    pub purchase_order_no: String,
    #[serde(rename = "preauthID", skip_serializing_if = "Option::is_none")]
    pub preauth_id: Option<String>,
    #[serde(rename = "txnID", skip_serializing_if = "Option::is_none")]
    pub txn_id: Option<String>,
    #[serde(rename = "CreditCardInfo", skip_serializing_if = "Option::is_none")]
    pub credit_card_info: Option<CreditCardInfo>,
}

/// Card block. Emitted empty when completing a pre-auth: the reservation
/// already holds the card, only the element itself is expected.
#[derive(Debug, Default, Serialize)]
pub struct CreditCardInfo {
    #[serde(rename = "cardNumber", skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    #[serde(rename = "expiryDate", skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(rename = "cvv", skip_serializing_if = "Option::is_none")]
    pub cvv: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PeriodicInfo {
    #[serde(rename = "PeriodicList")]
    pub periodic_list: PeriodicList,
}

#[derive(Debug, Serialize)]
pub struct PeriodicList {
    #[serde(rename = "@count")]
    pub count: u32,
    #[serde(rename = "PeriodicItem")]
    pub items: Vec<PeriodicItem>,
}

#[derive(Debug, Serialize)]
pub struct PeriodicItem {
    #[serde(rename = "@ID")]
    pub id: u32,
    #[serde(rename = "actionType")]
    pub action_type: &'static str,
    #[serde(rename = "clientID")]
    pub client_id: String,
    #[serde(rename = "CreditCardInfo", skip_serializing_if = "Option::is_none")]
    pub credit_card_info: Option<CreditCardInfo>,
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(rename = "periodicType", skip_serializing_if = "Option::is_none")]
    pub periodic_type: Option<u8>,
    #[serde(rename = "paymentInterval", skip_serializing_if = "Option::is_none")]
    pub payment_interval: Option<u32>,
    #[serde(rename = "startDate", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(rename = "numberOfPayments", skip_serializing_if = "Option::is_none")]
    pub number_of_payments: Option<u32>,
}

impl SecurePayMessage {
    fn envelope(
        auth: &MerchantAuth,
        test_mode: bool,
        kind: DocumentKind,
        meta: &MessageMeta,
    ) -> CustomResult<(MessageInfo, MerchantInfo), ConnectorError> {
        let message_timestamp = date_time::format_message_timestamp(meta.timestamp)
            .change_context(ConnectorError::RequestEncodingFailed)?;
        Ok((
            MessageInfo {
                message_id: meta.message_id.clone(),
                message_timestamp,
                timeout_value: constants::TIMEOUT_VALUE,
                api_version: kind.api_version(),
            },
            MerchantInfo {
                merchant_id: auth.merchant_id.clone(),
                password: auth.password_for_mode(test_mode).peek().clone(),
            },
        ))
    }

    /// Serialize with the XML declaration prepended.
    pub fn to_xml_bytes(&self) -> CustomResult<Vec<u8>, ConnectorError> {
        let body = quick_xml::se::to_string(self)
            .change_context(ConnectorError::RequestEncodingFailed)?;
        Ok(format!("{}\n{body}", constants::XML_DECLARATION).into_bytes())
    }
}

/// Echo: connectivity probe, envelope and credentials only.
pub fn compose_echo(
    auth: &MerchantAuth,
    test_mode: bool,
    meta: &MessageMeta,
) -> CustomResult<SecurePayMessage, ConnectorError> {
    let (message_info, merchant_info) =
        SecurePayMessage::envelope(auth, test_mode, DocumentKind::Echo, meta)?;
    Ok(SecurePayMessage {
        message_info,
        merchant_info,
        request_type: "Echo",
        payment: None,
        periodic: None,
    })
}

/// Payment: either a once-off transaction (standard, pre-auth reserve or
/// pre-auth complete) or a periodic-setup item, depending on the request's
/// repeat schedule.
pub fn compose_payment(
    auth: &MerchantAuth,
    request: &PaymentRequest,
    meta: &MessageMeta,
) -> CustomResult<SecurePayMessage, ConnectorError> {
    let kind = document_kind(
        false,
        request.is_periodic(),
        request.preauth,
        request.preauth_id.is_some(),
    );
    let cents = request
        .amount
        .to_minor_unit()
        .change_context(ConnectorError::AmountConversionFailed)?;
    let (message_info, merchant_info) = SecurePayMessage::envelope(auth, request.test_mode, kind, meta)?;

    match kind {
        DocumentKind::Payment { txn_type } => {
            let credit_card_info = if request.preauth_id.is_some() {
                // Completing a reservation: the element is present but empty.
                CreditCardInfo::default()
            } else {
                card_block(request)?
            };
            Ok(SecurePayMessage {
                message_info,
                merchant_info,
                request_type: "Payment",
                payment: Some(PaymentInfo {
                    txn_list: TxnList {
                        count: 1,
                        txns: vec![Txn {
                            id: 1,
                            txn_type,
                            txn_source: constants::TXN_SOURCE,
                            amount: cents.get_amount_as_i64(),
                            currency: request.currency.to_string(),
                            purchase_order_no: request.order_id.to_string(),
                            preauth_id: request.preauth_id.clone(),
                            txn_id: None,
                            credit_card_info: Some(credit_card_info),
                        }],
                    },
                }),
                periodic: None,
            })
        }
        DocumentKind::PeriodicSetup => {
            let schedule = request
                .repeat
                .as_ref()
                .ok_or(ConnectorError::MissingRequiredField {
                    field_name: "repeat",
                })?;
            let (periodic_type, payment_interval) = match schedule.period {
                RepeatPeriod::Daily => (
                    constants::PERIODIC_TYPE_DAY_BASED,
                    schedule.interval_days,
                ),
                period => (
                    constants::PERIODIC_TYPE_CALENDAR,
                    Some(u32::from(period.interval_code())),
                ),
            };
            let start_date =
                date_time::format_yyyymmdd(schedule.start.unwrap_or(meta.timestamp))
                    .change_context(ConnectorError::RequestEncodingFailed)?;
            let number_of_payments = if schedule.count > 0 {
                schedule.count
            } else {
                constants::UNBOUNDED_PAYMENT_CAP
            };
            Ok(SecurePayMessage {
                message_info,
                merchant_info,
                request_type: "Periodic",
                payment: None,
                periodic: Some(PeriodicInfo {
                    periodic_list: PeriodicList {
                        count: 1,
                        items: vec![PeriodicItem {
                            id: 1,
                            action_type: constants::ACTION_ADD,
                            client_id: request.order_id.to_string(),
                            credit_card_info: Some(card_block(request)?),
                            amount: cents.get_amount_as_i64(),
                            currency: Some(request.currency.to_string()),
                            periodic_type: Some(periodic_type),
                            payment_interval,
                            start_date: Some(start_date),
                            number_of_payments: Some(number_of_payments),
                        }],
                    },
                }),
            })
        }
        // compose_payment is only reached for the two shapes above.
        DocumentKind::Echo | DocumentKind::Trigger | DocumentKind::Refund => {
            Err(ConnectorError::RequestEncodingFailed.into())
        }
    }
}

/// Trigger: executes the next charge of an existing schedule. Carries only
/// the client id and amount.
pub fn compose_trigger(
    auth: &MerchantAuth,
    request: &TriggerRequest,
    meta: &MessageMeta,
) -> CustomResult<SecurePayMessage, ConnectorError> {
    let cents = request
        .amount
        .to_minor_unit()
        .change_context(ConnectorError::AmountConversionFailed)?;
    let (message_info, merchant_info) =
        SecurePayMessage::envelope(auth, request.test_mode, DocumentKind::Trigger, meta)?;
    Ok(SecurePayMessage {
        message_info,
        merchant_info,
        request_type: "Periodic",
        payment: None,
        periodic: Some(PeriodicInfo {
            periodic_list: PeriodicList {
                count: 1,
                items: vec![PeriodicItem {
                    id: 1,
                    action_type: constants::ACTION_TRIGGER,
                    client_id: request.order_id.to_string(),
                    credit_card_info: None,
                    amount: cents.get_amount_as_i64(),
                    currency: None,
                    periodic_type: None,
                    payment_interval: None,
                    start_date: None,
                    number_of_payments: None,
                }],
            },
        }),
    })
}

/// Refund: reverses up to the full amount of a prior transaction. No card
/// details; the original transaction id identifies the charge.
pub fn compose_refund(
    auth: &MerchantAuth,
    request: &RefundRequest,
    meta: &MessageMeta,
) -> CustomResult<SecurePayMessage, ConnectorError> {
    let cents = request
        .amount
        .to_minor_unit()
        .change_context(ConnectorError::AmountConversionFailed)?;
    let (message_info, merchant_info) =
        SecurePayMessage::envelope(auth, request.test_mode, DocumentKind::Refund, meta)?;
    Ok(SecurePayMessage {
        message_info,
        merchant_info,
        request_type: "Payment",
        payment: Some(PaymentInfo {
            txn_list: TxnList {
                count: 1,
                txns: vec![Txn {
                    id: 1,
                    txn_type: constants::TXN_TYPE_REFUND,
                    txn_source: constants::TXN_SOURCE,
                    amount: cents.get_amount_as_i64(),
                    currency: request.currency.to_string(),
                    purchase_order_no: request.order_id.to_string(),
                    preauth_id: request.preauth_id.clone(),
                    txn_id: Some(request.txn_id.clone()),
                    credit_card_info: None,
                }],
            },
        }),
        periodic: None,
    })
}

fn card_block(request: &PaymentRequest) -> CustomResult<CreditCardInfo, ConnectorError> {
    let card = request
        .card
        .as_ref()
        .ok_or(ConnectorError::MissingRequiredField { field_name: "card" })?;
    Ok(CreditCardInfo {
        card_number: Some(card.number.peek().to_string()),
        expiry_date: Some(card.expiry.to_string()),
        cvv: card.cvv.as_ref().map(|cvv| cvv.padded()),
    })
}

// ---------------------------------------------------------------------------
// Response documents (quick-xml deserialization)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SecurePayResponse {
    #[serde(rename = "Status")]
    pub status: ResponseStatus,
    #[serde(rename = "Payment")]
    pub payment: Option<PaymentResponseBlock>,
    #[serde(rename = "Periodic")]
    pub periodic: Option<PeriodicResponseBlock>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseStatus {
    #[serde(rename = "statusCode")]
    pub status_code: String,
    #[serde(rename = "statusDescription")]
    pub status_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentResponseBlock {
    #[serde(rename = "TxnList")]
    pub txn_list: Option<TxnListResponse>,
}

#[derive(Debug, Deserialize)]
pub struct TxnListResponse {
    #[serde(rename = "Txn", default)]
    pub txns: Vec<TxnResponse>,
}

#[derive(Debug, Deserialize)]
pub struct TxnResponse {
    #[serde(rename = "responseCode")]
    pub response_code: Option<String>,
    #[serde(rename = "responseText")]
    pub response_text: Option<String>,
    #[serde(rename = "txnID")]
    pub txn_id: Option<String>,
    #[serde(rename = "preauthID")]
    pub preauth_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PeriodicResponseBlock {
    #[serde(rename = "PeriodicList")]
    pub periodic_list: Option<PeriodicListResponse>,
}

#[derive(Debug, Deserialize)]
pub struct PeriodicListResponse {
    #[serde(rename = "PeriodicItem", default)]
    pub items: Vec<PeriodicItemResponse>,
}

#[derive(Debug, Deserialize)]
pub struct PeriodicItemResponse {
    #[serde(rename = "responseCode")]
    pub response_code: Option<String>,
    #[serde(rename = "responseText")]
    pub response_text: Option<String>,
}

/// Parse the raw response body into a [`GatewayResponse`].
///
/// The server-level code is extracted unconditionally; the transaction-level
/// data is probed over the two possible tree shapes in a fixed order, the
/// standard transaction list first, then the periodic item list.
pub fn parse_response(body: &[u8]) -> CustomResult<GatewayResponse, ConnectorError> {
    let text = std::str::from_utf8(body)
        .change_context(ConnectorError::ResponseDeserializationFailed)?;
    let parsed: SecurePayResponse = text
        .parse_xml()
        .change_context(ConnectorError::ResponseDeserializationFailed)?;

    let status_code = parsed
        .status
        .status_code
        .trim()
        .parse::<u32>()
        .change_context(ConnectorError::ResponseDeserializationFailed)?;

    let standard = parsed
        .payment
        .as_ref()
        .and_then(|payment| payment.txn_list.as_ref())
        .and_then(|list| list.txns.first())
        .and_then(|txn| {
            txn.response_code
                .as_ref()
                .map(|code| (txn, code.trim().to_string()))
        });

    let outcome = if let Some((txn, code)) = standard {
        TransactionOutcome::Standard(TxnResult {
            response_code: code
                .parse::<i64>()
                .change_context(ConnectorError::ResponseDeserializationFailed)?,
            response_text: txn.response_text.clone(),
            txn_id: txn.txn_id.clone().filter(|id| !id.is_empty()),
            preauth_id: txn.preauth_id.clone().filter(|id| !id.is_empty()),
        })
    } else if let Some((item, code)) = parsed
        .periodic
        .as_ref()
        .and_then(|periodic| periodic.periodic_list.as_ref())
        .and_then(|list| list.items.first())
        .and_then(|item| {
            item.response_code
                .as_ref()
                .map(|code| (item, code.trim().to_string()))
        })
    {
        TransactionOutcome::Periodic(PeriodicResult {
            response_code: code
                .parse::<i64>()
                .change_context(ConnectorError::ResponseDeserializationFailed)?,
            response_text: item.response_text.clone(),
        })
    } else {
        TransactionOutcome::NoTransaction
    };

    Ok(GatewayResponse {
        status_code,
        status_description: parsed.status.status_description.unwrap_or_default(),
        outcome,
    })
}

// ---------------------------------------------------------------------------
// Code translation tables
// ---------------------------------------------------------------------------

/// Translate the server-level (transport/session/credential) status code.
///
/// Unrecognized codes yield [`SecurepayStatus::Unknown`] with no message;
/// the raw value is logged for diagnosis.
pub fn translate_server_code(code: u32) -> StatusResult {
    match code {
        0 => StatusResult::new(SecurepayStatus::Ok),
        504 => StatusResult::with_message(
            SecurepayStatus::InvalidUser,
            "We are currently experiencing technical difficulties (Error: Credential failure with merchant ID). Please try again later",
        ),
        505 => StatusResult::with_message(
            SecurepayStatus::InvalidUrl,
            "We are currently experiencing technical difficulties (Error: Invalid SecurePay URL). Please try again later",
        ),
        510 => StatusResult::with_message(
            SecurepayStatus::ServerDown,
            "The credit card processor is currently experiencing difficulties. Please try again later",
        ),
        512 => StatusResult::with_message(
            SecurepayStatus::Timeout,
            "The credit card processor is currently experiencing difficulties. Please try again later",
        ),
        513 | 514 | 515 | 545 => StatusResult::with_message(
            SecurepayStatus::ServerError,
            "The credit card processor is currently experiencing difficulties. Please try again later",
        ),
        516 | 517 | 518 | 575 | 577 | 580 => StatusResult::with_message(
            SecurepayStatus::XmlError,
            "We are currently experiencing technical difficulties (Error: XML Processing Fault). Please try again later",
        ),
        524 => StatusResult::with_message(
            SecurepayStatus::ConnectionError,
            "We are currently experiencing technical difficulties (Error: Connection fault). Please try again later",
        ),
        550 => StatusResult::with_message(
            SecurepayStatus::InvalidPassword,
            "We are currently experiencing technical difficulties (Error: Credential failure with password). Please try again later",
        ),
        595 => StatusResult::with_message(SecurepayStatus::Declined, "Credit card declined"),
        other => {
            tracing::warn!(raw_code = other, "unrecognized gateway server status code");
            StatusResult::new(SecurepayStatus::Unknown)
        }
    }
}

/// Translate the transaction-level (card processor) response code.
///
/// 0, 8 and 77 are the approved family; every other value is a decline and
/// surfaces the same fixed message regardless of the vendor-specific reason.
pub fn translate_response_code(code: i64) -> StatusResult {
    if matches!(code, 0 | 8 | 77) {
        StatusResult::new(SecurepayStatus::Approved)
    } else {
        StatusResult::with_message(
            SecurepayStatus::Declined,
            "Your credit card details were declined",
        )
    }
}

/// Resolve a parsed response into the final status.
///
/// A non-Ok server-level code is final, whatever transaction-level content
/// the body carried. With the server level Ok, whichever transaction shape
/// was present supplies the result; a response with neither shape resolves
/// to the server-level translation (as for an echo).
pub fn classify(response: &GatewayResponse) -> StatusResult {
    let server = translate_server_code(response.status_code);
    if server.status != SecurepayStatus::Ok {
        return server;
    }
    match &response.outcome {
        TransactionOutcome::Standard(txn) => translate_response_code(txn.response_code),
        TransactionOutcome::Periodic(item) => translate_response_code(item.response_code),
        TransactionOutcome::NoTransaction => server,
    }
}
