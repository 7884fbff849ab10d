use std::path::PathBuf;

use common_utils::{consts, masking::Secret};
use domain_types::{Connectors, MerchantAuth, Proxy};

use crate::logger::config::Log;

#[derive(Clone, serde::Deserialize, Debug)]
pub struct Config {
    #[serde(default)]
    pub log: Log,
    #[serde(default)]
    pub proxy: Proxy,
    #[serde(default)]
    pub connectors: Connectors,
    pub merchant: MerchantConfig,
}

/// Merchant credentials as loaded from config. Passwords deserialize into
/// [`Secret`] so they stay out of debug output.
#[derive(Clone, serde::Deserialize, Debug)]
pub struct MerchantConfig {
    pub merchant_id: String,
    pub password: Secret<String>,
    pub test_password: Option<Secret<String>>,
    /// Route calls to the gateway's test endpoints.
    #[serde(default)]
    pub test_mode: bool,
}

impl From<&MerchantConfig> for MerchantAuth {
    fn from(config: &MerchantConfig) -> Self {
        Self {
            merchant_id: config.merchant_id.clone(),
            password: config.password.clone(),
            test_password: config.test_password.clone(),
        }
    }
}

impl Config {
    /// Build the configuration from the default locations: the environment's
    /// config file under `config/`, overridden by `SECUREPAY__`-prefixed
    /// environment variables.
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::new_with_config_path(None)
    }

    pub fn new_with_config_path(
        explicit_config_path: Option<PathBuf>,
    ) -> Result<Self, config::ConfigError> {
        let env = consts::Env::current_env();
        let config_path = Self::config_path(env, explicit_config_path);

        let config = config::Config::builder()
            .add_source(config::File::from(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SECUREPAY")
                    .try_parsing(true)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("proxy.bypass_proxy_urls"),
            )
            .build()?;

        serde_path_to_error::deserialize(config).map_err(|error| {
            tracing::error!(%error, "unable to deserialize application configuration");
            error.into_inner()
        })
    }

    /// Config path: explicit override, or `<workspace>/config/<env>.toml`.
    pub fn config_path(environment: consts::Env, explicit_config_path: Option<PathBuf>) -> PathBuf {
        let mut config_path = PathBuf::new();
        if let Some(explicit) = explicit_config_path {
            config_path.push(explicit);
        } else {
            config_path.push(workspace_path());
            config_path.push("config");
            config_path.push(environment.config_path());
        }
        config_path
    }
}

/// The workspace root, two levels up from this crate's manifest.
pub fn workspace_path() -> PathBuf {
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let mut path = PathBuf::from(manifest_dir);
        path.pop();
        path.pop();
        path
    } else {
        PathBuf::from(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merchant_config_converts_to_auth() {
        let merchant = MerchantConfig {
            merchant_id: "ABC0001".to_string(),
            password: Secret::new("live".to_string()),
            test_password: None,
            test_mode: true,
        };
        let auth = MerchantAuth::from(&merchant);
        assert_eq!(auth.merchant_id, "ABC0001");
        assert!(auth.test_password.is_none());
    }

    #[test]
    fn merchant_password_is_masked_in_debug_output() {
        let merchant = MerchantConfig {
            merchant_id: "ABC0001".to_string(),
            password: Secret::new("hunter2".to_string()),
            test_password: None,
            test_mode: false,
        };
        let rendered = format!("{merchant:?}");
        assert!(!rendered.contains("hunter2"));
    }
}
