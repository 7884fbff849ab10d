//! Endpoint and transport configuration.

use serde::Deserialize;

fn default_payment_url() -> String {
    "https://api.securepay.com.au/xmlapi/payment".to_string()
}

fn default_periodic_url() -> String {
    "https://api.securepay.com.au/xmlapi/periodic".to_string()
}

fn default_test_payment_url() -> String {
    "https://test.securepay.com.au/xmlapi/payment".to_string()
}

fn default_test_periodic_url() -> String {
    "https://test.securepay.com.au/xmlapi/periodic".to_string()
}

/// The four fixed gateway URLs. Selection is a pure function of
/// {periodic} x {test}.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurepayParams {
    #[serde(default = "default_payment_url")]
    pub base_url: String,
    #[serde(default = "default_periodic_url")]
    pub periodic_base_url: String,
    #[serde(default = "default_test_payment_url")]
    pub test_base_url: String,
    #[serde(default = "default_test_periodic_url")]
    pub test_periodic_base_url: String,
}

impl Default for SecurepayParams {
    fn default() -> Self {
        Self {
            base_url: default_payment_url(),
            periodic_base_url: default_periodic_url(),
            test_base_url: default_test_payment_url(),
            test_periodic_base_url: default_test_periodic_url(),
        }
    }
}

impl SecurepayParams {
    pub fn endpoint(&self, periodic: bool, test: bool) -> &str {
        match (periodic, test) {
            (false, false) => &self.base_url,
            (false, true) => &self.test_base_url,
            (true, false) => &self.periodic_base_url,
            (true, true) => &self.test_periodic_base_url,
        }
    }
}

/// Per-connector endpoint configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Connectors {
    #[serde(default)]
    pub securepay: SecurepayParams,
}

/// Outbound proxy configuration for the HTTP client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Proxy {
    pub http_url: Option<String>,
    pub https_url: Option<String>,
    pub idle_pool_connection_timeout: Option<u64>,
    #[serde(default)]
    pub bypass_proxy_urls: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_selection_covers_all_four_urls() {
        let params = SecurepayParams::default();
        assert_eq!(
            params.endpoint(false, false),
            "https://api.securepay.com.au/xmlapi/payment"
        );
        assert_eq!(
            params.endpoint(false, true),
            "https://test.securepay.com.au/xmlapi/payment"
        );
        assert_eq!(
            params.endpoint(true, false),
            "https://api.securepay.com.au/xmlapi/periodic"
        );
        assert_eq!(
            params.endpoint(true, true),
            "https://test.securepay.com.au/xmlapi/periodic"
        );
    }
}
