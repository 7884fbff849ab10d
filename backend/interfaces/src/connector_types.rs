use bytes::Bytes;
use common_utils::errors::CustomResult;
use domain_types::errors::ApiClientError;

/// The single transport operation the core needs: send a composed document to
/// a URL, get the raw response body back.
///
/// Exactly one attempt is made per call; retry policy is out of scope.
/// Implementations must bound the call with a client-side deadline, since the
/// gateway's envelope timeout is advisory only. Swappable so tests can
/// substitute a spy.
#[async_trait::async_trait]
pub trait Dispatch: Send + Sync {
    async fn dispatch(&self, url: &str, body: Vec<u8>) -> CustomResult<Bytes, ApiClientError>;
}
