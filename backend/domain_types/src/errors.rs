//! Error taxonomy.
//!
//! Validation errors live in `common_utils::errors` and never touch the
//! network. Everything here is reachable only after a document has been
//! composed.

/// Errors raised while composing requests for, or interpreting responses
/// from, the gateway.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ConnectorError {
    #[error("Failed to encode connector request")]
    RequestEncodingFailed,
    #[error("Failed to deserialize connector response")]
    ResponseDeserializationFailed,
    #[error("Missing required field: {field_name}")]
    MissingRequiredField { field_name: &'static str },
    #[error("Failed to convert amount to the gateway's minor unit")]
    AmountConversionFailed,
}

/// Transport-level errors from the HTTP client. A single attempt is made per
/// call; none of these are retried.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ApiClientError {
    #[error("Failed to parse the request URL")]
    UrlEncodingFailed,
    #[error("Failed to construct the HTTP client")]
    ClientConstructionFailed,
    #[error("Invalid proxy configuration")]
    InvalidProxyConfiguration,
    #[error("Unable to send request to the gateway: {0}")]
    RequestNotSent(String),
    #[error("Request timed out")]
    RequestTimeoutReceived,
    #[error("Failed to read the response body")]
    ResponseDecodingFailed,
    #[error("Unexpected HTTP status from the gateway: {status_code}")]
    UnexpectedServerResponse { status_code: u16 },
}
