//! HTTP transport for the gateway.
//!
//! One attempt per call, bounded by a client-side deadline. The historical
//! implementation pinned TLS 1.0 to dodge the POODLE-era downgrade dance;
//! with rustls the platform default negotiates, which is a deliberate
//! relaxation of that constraint.

use std::time::Duration;

use bytes::Bytes;
use common_utils::errors::CustomResult;
use domain_types::{errors::ApiClientError, Proxy};
use error_stack::{report, ResultExt};
use once_cell::sync::OnceCell;
use reqwest::Client;

/// Default client-side deadline per dispatch. Matches the advisory
/// timeoutValue carried in the request envelope; without it the exchange
/// could wedge indefinitely.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

static NON_PROXIED_CLIENT: OnceCell<Client> = OnceCell::new();
static PROXIED_CLIENT: OnceCell<Client> = OnceCell::new();

fn get_base_client(proxy_config: &Proxy) -> CustomResult<Client, ApiClientError> {
    let proxied = proxy_config.http_url.is_some() || proxy_config.https_url.is_some();
    Ok(if proxied {
        &PROXIED_CLIENT
    } else {
        &NON_PROXIED_CLIENT
    }
    .get_or_try_init(|| {
        get_client_builder(proxy_config)?
            .build()
            .change_context(ApiClientError::ClientConstructionFailed)
    })?
    .clone())
}

fn get_client_builder(
    proxy_config: &Proxy,
) -> CustomResult<reqwest::ClientBuilder, ApiClientError> {
    let mut client_builder = Client::builder().pool_idle_timeout(Duration::from_secs(
        proxy_config.idle_pool_connection_timeout.unwrap_or(90),
    ));

    if let Some(url) = proxy_config.https_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::https(url)
                .change_context(ApiClientError::InvalidProxyConfiguration)?,
        );
    }

    if let Some(url) = proxy_config.http_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::http(url).change_context(ApiClientError::InvalidProxyConfiguration)?,
        );
    }

    Ok(client_builder)
}

/// The production dispatcher: POSTs a composed document as `text/xml` and
/// returns the raw response body.
#[derive(Debug, Clone)]
pub struct ReqwestDispatcher {
    client: Client,
    timeout: Duration,
}

impl ReqwestDispatcher {
    pub fn new(proxy: &Proxy) -> CustomResult<Self, ApiClientError> {
        Ok(Self {
            client: get_base_client(proxy)?,
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait::async_trait]
impl interfaces::Dispatch for ReqwestDispatcher {
    #[tracing::instrument(skip(self, body), fields(url = %url, latency_ms = tracing::field::Empty))]
    async fn dispatch(&self, url: &str, body: Vec<u8>) -> CustomResult<Bytes, ApiClientError> {
        let url = reqwest::Url::parse(url).change_context(ApiClientError::UrlEncodingFailed)?;
        let start = std::time::Instant::now();

        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "text/xml")
            .timeout(self.timeout)
            .body(body)
            .send()
            .await
            .map_err(|error| {
                let api_error = if error.is_timeout() {
                    ApiClientError::RequestTimeoutReceived
                } else {
                    ApiClientError::RequestNotSent(error.to_string())
                };
                tracing::warn!(error = %error, "unable to send request to the gateway");
                report!(api_error)
            })?;

        tracing::Span::current().record("latency_ms", start.elapsed().as_millis() as u64);

        let status_code = response.status().as_u16();
        match status_code {
            200..=202 | 204 | 302 => response
                .bytes()
                .await
                .change_context(ApiClientError::ResponseDecodingFailed),
            other => {
                tracing::warn!(status_code = other, "unexpected HTTP status from the gateway");
                Err(report!(ApiClientError::UnexpectedServerResponse {
                    status_code: other
                }))
            }
        }
    }
}
