use std::sync::Arc;

use common_utils::errors::{CustomResult, ValidationError};
use connector_integration::securepay::{
    document_kind,
    transformers::{self, MessageMeta, SecurePayMessage},
    DocumentKind, Securepay,
};
use domain_types::{
    errors::ApiClientError, types::SecurepayParams, ChargeOutcome, GatewayResponse, MerchantAuth,
    PaymentRequest, RefundOutcome, RefundRequest, SecurepayStatus, StatusResult,
    TransactionOutcome, TriggerRequest,
};
use error_stack::{report, Report, ResultExt};
use external_services::ReqwestDispatcher;
use interfaces::Dispatch;

use crate::configs::Config;

/// Errors a client operation can return directly. Everything the gateway or
/// the network reports comes back inside the operation's outcome as a
/// [`StatusResult`] instead, so callers branch on one vocabulary.
#[derive(Debug, thiserror::Error)]
pub enum SecurepayError {
    /// Caller-correctable input problem. No network call was made.
    #[error("{0}")]
    Validation(ValidationError),
    /// The request document could not be composed or encoded.
    #[error("Failed to compose the gateway request")]
    Compose,
    /// The HTTP client could not be constructed from the configuration.
    #[error("Failed to construct the transport")]
    Transport,
}

/// Client for the SecurePay XML API.
///
/// One logical transaction per call chain: each operation composes, sends
/// and interprets sequentially, and no operation starts before the previous
/// one's response (or failure) is observed. Credentials are read-only after
/// construction, so independent concurrent calls on the same client are safe.
pub struct SecurepayClient {
    auth: MerchantAuth,
    params: SecurepayParams,
    test_mode: bool,
    dispatcher: Arc<dyn Dispatch>,
}

impl SecurepayClient {
    /// Build a client with the production transport.
    pub fn new(config: &Config) -> CustomResult<Self, SecurepayError> {
        let dispatcher = ReqwestDispatcher::new(&config.proxy)
            .change_context(SecurepayError::Transport)?;
        Ok(Self::with_dispatcher(
            MerchantAuth::from(&config.merchant),
            config.connectors.securepay.clone(),
            config.merchant.test_mode,
            Arc::new(dispatcher),
        ))
    }

    /// Build a client over any [`Dispatch`] implementation. This is the seam
    /// tests use to substitute a spy for the network.
    pub fn with_dispatcher(
        auth: MerchantAuth,
        params: SecurepayParams,
        test_mode: bool,
        dispatcher: Arc<dyn Dispatch>,
    ) -> Self {
        Self {
            auth,
            params,
            test_mode,
            dispatcher,
        }
    }

    /// Connectivity/credential probe. Resolves to the server-level status.
    #[tracing::instrument(skip_all)]
    pub async fn echo(&self) -> CustomResult<StatusResult, SecurepayError> {
        let meta = MessageMeta::generate();
        let message = transformers::compose_echo(&self.auth, self.test_mode, &meta)
            .change_context(SecurepayError::Compose)?;
        let (status, _) = self
            .exchange(DocumentKind::Echo, &message, self.test_mode)
            .await?;
        Ok(status)
    }

    /// `true` iff the gateway answered the echo with an Ok server status.
    pub async fn test_connection(&self) -> CustomResult<bool, SecurepayError> {
        Ok(self.echo().await?.status == SecurepayStatus::Ok)
    }

    /// Process a payment: once-off, pre-auth reserve/complete, or periodic
    /// setup depending on the request.
    ///
    /// Validation runs first and fails without any network traffic. For a
    /// periodic request with auto-trigger enabled, a trigger call is chained
    /// as soon as the setup call classifies; the outcome carries both
    /// results, with the trigger's taking precedence in
    /// [`ChargeOutcome::status`].
    #[tracing::instrument(skip_all, fields(order_id = %request.order_id, periodic = request.is_periodic()))]
    pub async fn charge(
        &self,
        request: PaymentRequest,
    ) -> CustomResult<ChargeOutcome, SecurepayError> {
        // A client configured for test mode forces it; a request can still
        // opt in individually.
        let mut request = request;
        request.test_mode |= self.test_mode;
        request
            .validate()
            .map_err(|error| report!(SecurepayError::Validation(error)))?;

        let cents = request
            .amount
            .to_minor_unit()
            .change_context(SecurepayError::Compose)?;
        let meta = MessageMeta::generate();
        let message = transformers::compose_payment(&self.auth, &request, &meta)
            .change_context(SecurepayError::Compose)?;
        let kind = document_kind(
            false,
            request.is_periodic(),
            request.preauth,
            request.preauth_id.is_some(),
        );

        let (payment_status, response) =
            self.exchange(kind, &message, request.test_mode).await?;

        let (txn_id, preauth_id) = captured_ids(&payment_status, response.as_ref(), request.preauth);

        let trigger = match (&request.repeat, &response) {
            (Some(schedule), Some(_)) if schedule.auto_trigger => {
                let trigger_request = TriggerRequest::new(request.order_id.clone(), request.amount)
                    .with_test_mode(request.test_mode);
                Some(self.trigger(trigger_request).await?)
            }
            _ => None,
        };

        let outcome = ChargeOutcome {
            message_id: meta.message_id,
            payment: payment_status,
            trigger,
            txn_id,
            preauth_id,
            amount: cents,
        };
        tracing::info!(status = %outcome.status().status, "charge completed");
        Ok(outcome)
    }

    /// Execute the next charge of an existing periodic schedule.
    #[tracing::instrument(skip_all, fields(order_id = %request.order_id))]
    pub async fn trigger(
        &self,
        request: TriggerRequest,
    ) -> CustomResult<StatusResult, SecurepayError> {
        let mut request = request;
        request.test_mode |= self.test_mode;
        request
            .validate()
            .map_err(|error| report!(SecurepayError::Validation(error)))?;

        let meta = MessageMeta::generate();
        let message = transformers::compose_trigger(&self.auth, &request, &meta)
            .change_context(SecurepayError::Compose)?;
        let (status, _) = self
            .exchange(DocumentKind::Trigger, &message, request.test_mode)
            .await?;
        tracing::info!(status = %status.status, "trigger completed");
        Ok(status)
    }

    /// Refund a previously approved transaction, up to its original amount.
    #[tracing::instrument(skip_all, fields(order_id = %request.order_id))]
    pub async fn refund(
        &self,
        request: RefundRequest,
    ) -> CustomResult<RefundOutcome, SecurepayError> {
        let mut request = request;
        request.test_mode |= self.test_mode;
        request
            .validate()
            .map_err(|error| report!(SecurepayError::Validation(error)))?;

        let cents = request
            .amount
            .to_minor_unit()
            .change_context(SecurepayError::Compose)?;
        let meta = MessageMeta::generate();
        let message = transformers::compose_refund(&self.auth, &request, &meta)
            .change_context(SecurepayError::Compose)?;
        let (result, response) = self
            .exchange(DocumentKind::Refund, &message, request.test_mode)
            .await?;

        let (txn_id, _) = captured_ids(&result, response.as_ref(), false);
        tracing::info!(status = %result.status, "refund completed");
        Ok(RefundOutcome {
            message_id: meta.message_id,
            result,
            txn_id,
            amount: cents,
        })
    }

    /// Send one composed document and interpret the reply.
    ///
    /// Transport failures and malformed bodies resolve to a terminal
    /// [`StatusResult`] with no parsed response; a parsed response always
    /// classifies. A single attempt, no retries.
    async fn exchange(
        &self,
        kind: DocumentKind,
        message: &SecurePayMessage,
        test_mode: bool,
    ) -> CustomResult<(StatusResult, Option<GatewayResponse>), SecurepayError> {
        let url = Securepay::endpoint(&self.params, kind, test_mode);
        let body = message
            .to_xml_bytes()
            .change_context(SecurepayError::Compose)?;

        match self.dispatcher.dispatch(url, body).await {
            Err(error) => {
                tracing::error!(?error, "transport failure");
                Ok((transport_status(&error), None))
            }
            Ok(bytes) => match transformers::parse_response(&bytes) {
                Err(error) => {
                    tracing::error!(?error, "gateway returned a malformed response");
                    Ok((
                        StatusResult::with_message(
                            SecurepayStatus::XmlError,
                            "The gateway returned a malformed response",
                        ),
                        None,
                    ))
                }
                Ok(response) => {
                    let status = transformers::classify(&response);
                    Ok((status, Some(response)))
                }
            },
        }
    }
}

/// Capture ids from a classified response: the transaction id only on
/// approval, the pre-auth id only when the call asked for a reservation.
fn captured_ids(
    status: &StatusResult,
    response: Option<&GatewayResponse>,
    was_preauth: bool,
) -> (Option<String>, Option<String>) {
    match response.map(|r| &r.outcome) {
        Some(TransactionOutcome::Standard(txn)) => (
            if status.is_approved() {
                txn.txn_id.clone()
            } else {
                None
            },
            if was_preauth {
                txn.preauth_id.clone()
            } else {
                None
            },
        ),
        _ => (None, None),
    }
}

fn transport_status(error: &Report<ApiClientError>) -> StatusResult {
    match error.current_context() {
        ApiClientError::RequestTimeoutReceived => StatusResult::with_message(
            SecurepayStatus::Timeout,
            "The connection to the payment gateway timed out",
        ),
        other => StatusResult::with_message(
            SecurepayStatus::ConnectionError,
            format!("Unable to reach the payment gateway: {other}"),
        ),
    }
}
