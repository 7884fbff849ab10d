//! Shared constants.

/// Length of a gateway message id, in hex characters.
pub const MESSAGE_ID_LENGTH: usize = 30;

/// Maximum length of a purchase-order / client id.
pub const MAX_ORDER_ID_LENGTH: usize = 60;

/// Minimum length of a purchase-order / client id.
pub const MIN_ORDER_ID_LENGTH: usize = 1;

/// Environment the client is running in. Selects the config file and, via
/// test mode, the endpoint family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Env {
    Development,
    Sandbox,
    Production,
}

impl Env {
    /// Read the environment from `RUN_ENV`, defaulting to development.
    pub fn current_env() -> Self {
        match std::env::var("RUN_ENV").as_deref() {
            Ok("production") | Ok("Production") => Self::Production,
            Ok("sandbox") | Ok("Sandbox") => Self::Sandbox,
            _ => Self::Development,
        }
    }

    /// Config file name for this environment.
    pub fn config_path(self) -> &'static str {
        match self {
            Self::Development => "development.toml",
            Self::Sandbox => "sandbox.toml",
            Self::Production => "production.toml",
        }
    }
}

impl std::fmt::Display for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Development => "development",
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        })
    }
}
