//! End-to-end client flows against a dispatcher spy.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use common_utils::errors::CustomResult;
use domain_types::errors::ApiClientError;
use error_stack::report;
use interfaces::Dispatch;
use securepay_client::{
    CardDetails, CardNumber, Currency, Cvv, ExpiryDate, FloatMajorUnit, MerchantAuth, OrderId,
    PaymentRequest, RefundRequest, RepeatPeriod, RepeatSchedule, Secret, SecurepayClient,
    SecurepayError, SecurepayStatus, TriggerRequest,
};

const TEST_PAYMENT_URL: &str = "https://test.securepay.com.au/xmlapi/payment";
const TEST_PERIODIC_URL: &str = "https://test.securepay.com.au/xmlapi/periodic";

enum MockReply {
    Body(String),
    Timeout,
    ConnectionRefused,
}

/// Dispatcher spy: records every (url, body) pair and plays back canned
/// replies in order.
struct MockDispatcher {
    calls: Mutex<Vec<(String, String)>>,
    replies: Mutex<VecDeque<MockReply>>,
}

impl MockDispatcher {
    fn new(replies: Vec<MockReply>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            replies: Mutex::new(replies.into_iter().collect()),
        }
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Dispatch for MockDispatcher {
    async fn dispatch(&self, url: &str, body: Vec<u8>) -> CustomResult<Bytes, ApiClientError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), String::from_utf8(body).unwrap()));
        match self.replies.lock().unwrap().pop_front() {
            Some(MockReply::Body(body)) => Ok(Bytes::from(body)),
            Some(MockReply::Timeout) => Err(report!(ApiClientError::RequestTimeoutReceived)),
            Some(MockReply::ConnectionRefused) => Err(report!(ApiClientError::RequestNotSent(
                "connection refused".to_string()
            ))),
            None => panic!("dispatcher received more calls than replies were enqueued"),
        }
    }
}

fn auth() -> MerchantAuth {
    MerchantAuth::new("ABC0001", Secret::new("live-password".to_string()))
        .with_test_password(Secret::new("test-password".to_string()))
}

fn client_with(replies: Vec<MockReply>) -> (SecurepayClient, Arc<MockDispatcher>) {
    let spy = Arc::new(MockDispatcher::new(replies));
    let client = SecurepayClient::with_dispatcher(
        auth(),
        domain_types::SecurepayParams::default(),
        true,
        spy.clone(),
    );
    (client, spy)
}

fn card() -> CardDetails {
    CardDetails::new(
        CardNumber::new("4444333322221111"),
        ExpiryDate::parse("08/29").unwrap(),
    )
    .with_cvv(Cvv::new("123"))
}

fn payment_request() -> PaymentRequest {
    PaymentRequest::new(
        FloatMajorUnit::new(4.12),
        Currency::USD,
        OrderId::new("INV-1001").unwrap(),
    )
    .with_card(card())
}

fn standard_approved(txn_id: &str, preauth_id: Option<&str>) -> MockReply {
    let preauth = preauth_id
        .map(|id| format!("<preauthID>{id}</preauthID>"))
        .unwrap_or_default();
    MockReply::Body(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<SecurePayMessage>
  <Status><statusCode>000</statusCode><statusDescription>Normal</statusDescription></Status>
  <Payment>
    <TxnList count="1">
      <Txn ID="1">
        <responseCode>00</responseCode>
        <responseText>Approved</responseText>
        <txnID>{txn_id}</txnID>
        {preauth}
      </Txn>
    </TxnList>
  </Payment>
</SecurePayMessage>"#
    ))
}

fn standard_declined(code: i64) -> MockReply {
    MockReply::Body(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<SecurePayMessage>
  <Status><statusCode>000</statusCode><statusDescription>Normal</statusDescription></Status>
  <Payment>
    <TxnList count="1">
      <Txn ID="1">
        <responseCode>{code}</responseCode>
        <responseText>Insufficient Funds</responseText>
        <txnID>999</txnID>
      </Txn>
    </TxnList>
  </Payment>
</SecurePayMessage>"#
    ))
}

fn periodic_reply(code: i64) -> MockReply {
    MockReply::Body(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<SecurePayMessage>
  <Status><statusCode>0</statusCode><statusDescription>Normal</statusDescription></Status>
  <Periodic>
    <PeriodicList count="1">
      <PeriodicItem ID="1">
        <actionType>add</actionType>
        <responseCode>{code}</responseCode>
        <responseText>Successful</responseText>
      </PeriodicItem>
    </PeriodicList>
  </Periodic>
</SecurePayMessage>"#
    ))
}

fn server_fault(status_code: u32) -> MockReply {
    MockReply::Body(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<SecurePayMessage>
  <Status><statusCode>{status_code}</statusCode><statusDescription>Fault</statusDescription></Status>
</SecurePayMessage>"#
    ))
}

fn echo_ok() -> MockReply {
    MockReply::Body(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<SecurePayMessage>
  <Status><statusCode>000</statusCode><statusDescription>Normal</statusDescription></Status>
</SecurePayMessage>"#
            .to_string(),
    )
}

// Once-off USD 4.12: the document carries amount 412 / currency USD /
// txnType 0, and the approved reply yields the captured transaction id.
#[tokio::test]
async fn test_once_off_payment_success() {
    let (client, spy) = client_with(vec![standard_approved("123456", None)]);
    let outcome = client.charge(payment_request()).await.unwrap();

    assert_eq!(outcome.status().status, SecurepayStatus::Approved);
    assert_eq!(outcome.txn_id.as_deref(), Some("123456"));
    assert_eq!(outcome.preauth_id, None);
    assert!(outcome.trigger.is_none());
    assert_eq!(outcome.amount.get_amount_as_i64(), 412);
    assert_eq!(outcome.message_id.len(), 30);
    assert!(outcome.message_id.chars().all(|c| c.is_ascii_hexdigit()));

    let calls = spy.calls();
    assert_eq!(calls.len(), 1);
    let (url, body) = &calls[0];
    assert_eq!(url, TEST_PAYMENT_URL);
    assert!(body.contains("<txnType>0</txnType>"));
    assert!(body.contains("<amount>412</amount>"));
    assert!(body.contains("<currency>USD</currency>"));
    assert!(body.contains("<purchaseOrderNo>INV-1001</purchaseOrderNo>"));
    assert!(body.contains("<password>test-password</password>"));
}

#[tokio::test]
async fn test_declined_transaction_keeps_fixed_message() {
    let (client, _spy) = client_with(vec![standard_declined(154)]);
    let outcome = client.charge(payment_request()).await.unwrap();

    assert_eq!(outcome.status().status, SecurepayStatus::Declined);
    assert_eq!(
        outcome.status().message.as_deref(),
        Some("Your credit card details were declined")
    );
    // The transaction id is only captured on approval.
    assert_eq!(outcome.txn_id, None);
}

// Pre-auth reservation: txnType 10, and the reply's preauthID is captured
// for the later completion call.
#[tokio::test]
async fn test_preauth_reservation_and_completion() {
    let (client, spy) = client_with(vec![
        standard_approved("111", Some("PA-9")),
        standard_approved("222", None),
    ]);

    let reservation = client
        .charge(payment_request().with_preauth())
        .await
        .unwrap();
    assert_eq!(reservation.status().status, SecurepayStatus::Approved);
    assert_eq!(reservation.preauth_id.as_deref(), Some("PA-9"));

    let completion = client
        .charge(
            PaymentRequest::new(
                FloatMajorUnit::new(4.12),
                Currency::USD,
                OrderId::new("INV-1001").unwrap(),
            )
            .with_preauth()
            .with_preauth_id(reservation.preauth_id.unwrap()),
        )
        .await
        .unwrap();
    assert_eq!(completion.status().status, SecurepayStatus::Approved);

    let calls = spy.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].1.contains("<txnType>10</txnType>"));
    assert!(calls[1].1.contains("<txnType>11</txnType>"));
    assert!(calls[1].1.contains("<preauthID>PA-9</preauthID>"));
    // Completing a reservation resends no card details.
    assert!(!calls[1].1.contains("cardNumber"));
}

// Monthly schedule with auto-trigger: setup document then an automatic
// trigger call, both against the periodic endpoint.
#[tokio::test]
async fn test_periodic_setup_chains_auto_trigger() {
    let (client, spy) = client_with(vec![periodic_reply(0), standard_approved("333", None)]);

    let request = payment_request().with_repeat(RepeatSchedule::new(RepeatPeriod::Monthly));
    let outcome = client.charge(request).await.unwrap();

    assert_eq!(outcome.payment.status, SecurepayStatus::Approved);
    assert_eq!(
        outcome.trigger.as_ref().map(|t| t.status),
        Some(SecurepayStatus::Approved)
    );
    assert_eq!(outcome.status().status, SecurepayStatus::Approved);

    let calls = spy.calls();
    assert_eq!(calls.len(), 2);
    let (setup_url, setup_body) = &calls[0];
    assert_eq!(setup_url, TEST_PERIODIC_URL);
    assert!(setup_body.contains("<actionType>add</actionType>"));
    assert!(setup_body.contains("<periodicType>3</periodicType>"));
    assert!(setup_body.contains("<paymentInterval>3</paymentInterval>"));
    assert!(setup_body.contains("<numberOfPayments>999</numberOfPayments>"));
    assert!(setup_body.contains("<apiVersion>spxml-3.0</apiVersion>"));

    let (trigger_url, trigger_body) = &calls[1];
    assert_eq!(trigger_url, TEST_PERIODIC_URL);
    assert!(trigger_body.contains("<actionType>trigger</actionType>"));
    assert!(trigger_body.contains("<clientID>INV-1001</clientID>"));
    assert!(trigger_body.contains("<amount>412</amount>"));
}

// "Setup succeeded, trigger failed" stays distinguishable from "setup
// failed": the overall status reflects the trigger, the setup result is
// retained alongside it.
#[tokio::test]
async fn test_trigger_failure_masks_overall_status_but_keeps_setup_result() {
    let (client, _spy) = client_with(vec![periodic_reply(0), standard_declined(154)]);

    let request = payment_request().with_repeat(RepeatSchedule::new(RepeatPeriod::Monthly));
    let outcome = client.charge(request).await.unwrap();

    assert_eq!(outcome.payment.status, SecurepayStatus::Approved);
    assert_eq!(outcome.status().status, SecurepayStatus::Declined);
}

#[tokio::test]
async fn test_auto_trigger_disabled_makes_a_single_call() {
    let (client, spy) = client_with(vec![periodic_reply(0)]);

    let request = payment_request()
        .with_repeat(RepeatSchedule::new(RepeatPeriod::Monthly).with_auto_trigger(false));
    let outcome = client.charge(request).await.unwrap();

    assert!(outcome.trigger.is_none());
    assert_eq!(spy.calls().len(), 1);
}

#[tokio::test]
async fn test_no_trigger_after_transport_failure() {
    let (client, spy) = client_with(vec![MockReply::Timeout]);

    let request = payment_request().with_repeat(RepeatSchedule::new(RepeatPeriod::Monthly));
    let outcome = client.charge(request).await.unwrap();

    assert_eq!(outcome.status().status, SecurepayStatus::Timeout);
    assert!(outcome.trigger.is_none());
    assert_eq!(spy.calls().len(), 1);
}

// Server-level 595 is final no matter what the transaction list says.
#[tokio::test]
async fn test_server_level_decline_is_terminal() {
    let (client, _spy) = client_with(vec![server_fault(595)]);
    let outcome = client.charge(payment_request()).await.unwrap();

    assert_eq!(outcome.status().status, SecurepayStatus::Declined);
    assert_eq!(
        outcome.status().message.as_deref(),
        Some("Credit card declined")
    );
}

#[tokio::test]
async fn test_server_fault_statuses() {
    for (code, status) in [
        (510u32, SecurepayStatus::ServerDown),
        (512, SecurepayStatus::Timeout),
        (550, SecurepayStatus::InvalidPassword),
    ] {
        let (client, _spy) = client_with(vec![server_fault(code)]);
        let outcome = client.charge(payment_request()).await.unwrap();
        assert_eq!(outcome.status().status, status, "code {code}");
        assert!(outcome.status().message.is_some());
    }
}

// An out-of-bounds order id never reaches the dispatcher: the typed id
// refuses to construct, so no request value can exist for it.
#[tokio::test]
async fn test_oversized_order_id_makes_no_network_call() {
    let (_client, spy) = client_with(vec![]);

    let oversized = "x".repeat(61);
    assert!(OrderId::new(oversized).is_err());
    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn test_validation_failure_makes_no_network_call() {
    let (client, spy) = client_with(vec![]);

    let request = PaymentRequest::new(
        FloatMajorUnit::new(4.12),
        Currency::USD,
        OrderId::new("INV-1001").unwrap(),
    )
    .with_card(CardDetails::new(
        CardNumber::new("not-a-card"),
        ExpiryDate::parse("08/29").unwrap(),
    ));

    let error = client.charge(request).await.unwrap_err();
    assert!(matches!(
        error.current_context(),
        SecurepayError::Validation(_)
    ));
    assert_eq!(
        error.current_context().to_string(),
        "Invalid Credit Card Number"
    );
    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn test_transport_timeout_maps_to_timeout_status() {
    let (client, _spy) = client_with(vec![MockReply::Timeout]);
    let outcome = client.charge(payment_request()).await.unwrap();

    assert_eq!(outcome.status().status, SecurepayStatus::Timeout);
    assert!(outcome.status().message.is_some());
}

#[tokio::test]
async fn test_connection_failure_maps_to_connection_status() {
    let (client, _spy) = client_with(vec![MockReply::ConnectionRefused]);
    let outcome = client.charge(payment_request()).await.unwrap();

    assert_eq!(outcome.status().status, SecurepayStatus::ConnectionError);
}

#[tokio::test]
async fn test_malformed_response_maps_to_xml_error() {
    let (client, _spy) = client_with(vec![MockReply::Body("<not-xml".to_string())]);
    let outcome = client.charge(payment_request()).await.unwrap();

    assert_eq!(outcome.status().status, SecurepayStatus::XmlError);
    assert!(outcome.status().message.is_some());
}

#[tokio::test]
async fn test_echo_and_test_connection() {
    let (client, spy) = client_with(vec![echo_ok(), echo_ok()]);

    let status = client.echo().await.unwrap();
    assert_eq!(status.status, SecurepayStatus::Ok);
    assert!(client.test_connection().await.unwrap());

    let calls = spy.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, TEST_PAYMENT_URL);
    assert!(calls[0].1.contains("<RequestType>Echo</RequestType>"));
}

#[tokio::test]
async fn test_failed_echo_reports_false() {
    let (client, _spy) = client_with(vec![server_fault(504)]);
    assert!(!client.test_connection().await.unwrap());
}

#[tokio::test]
async fn test_refund_flow() {
    let (client, spy) = client_with(vec![standard_approved("REF-1", None)]);

    let outcome = client
        .refund(RefundRequest::new(
            "123456",
            OrderId::new("INV-1001").unwrap(),
            FloatMajorUnit::new(2.50),
            Currency::USD,
        ))
        .await
        .unwrap();

    assert_eq!(outcome.result.status, SecurepayStatus::Approved);
    assert_eq!(outcome.txn_id.as_deref(), Some("REF-1"));
    assert_eq!(outcome.amount.get_amount_as_i64(), 250);

    let calls = spy.calls();
    assert_eq!(calls.len(), 1);
    let (url, body) = &calls[0];
    assert_eq!(url, TEST_PAYMENT_URL);
    assert!(body.contains("<txnType>4</txnType>"));
    assert!(body.contains("<txnID>123456</txnID>"));
    assert!(!body.contains("CreditCardInfo"));
}

#[tokio::test]
async fn test_refund_rejects_missing_transaction_id() {
    let (client, spy) = client_with(vec![]);

    let error = client
        .refund(RefundRequest::new(
            "",
            OrderId::new("INV-1001").unwrap(),
            FloatMajorUnit::new(2.50),
            Currency::USD,
        ))
        .await
        .unwrap_err();
    assert!(matches!(
        error.current_context(),
        SecurepayError::Validation(_)
    ));
    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn test_manual_trigger() {
    let (client, spy) = client_with(vec![standard_approved("T-1", None)]);

    let status = client
        .trigger(TriggerRequest::new(
            OrderId::new("INV-1001").unwrap(),
            FloatMajorUnit::new(4.12),
        ))
        .await
        .unwrap();

    assert_eq!(status.status, SecurepayStatus::Approved);
    let calls = spy.calls();
    assert_eq!(calls[0].0, TEST_PERIODIC_URL);
    assert!(calls[0].1.contains("<actionType>trigger</actionType>"));
}
